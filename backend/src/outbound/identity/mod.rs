//! Identity provider adapters.
//!
//! The in-memory fixture lives beside the port in
//! [`crate::domain::ports::FixtureIdentityProvider`]; this module holds the
//! hosted user pool adapter.

mod cognito;

pub use cognito::CognitoIdentityProvider;
