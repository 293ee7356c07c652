//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: document store repositories (in-memory or DynamoDB)
//! - **identity**: Cognito user pool adapter
//! - **aws**: shared AWS SDK configuration loading
//!
//! Adapters are thin translators between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod aws;
pub mod identity;
pub mod persistence;
