//! Driving port for account registration and login.

use async_trait::async_trait;

use crate::domain::{
    AuthTokens, ConfirmationCode, Credentials, Error, PasswordReset, SignUpDetails, SignUpOutcome,
};

/// Domain use-case port for the auth endpoints.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountCommand: Send + Sync {
    async fn sign_up(&self, details: SignUpDetails) -> Result<SignUpOutcome, Error>;

    async fn confirm_sign_up(&self, code: ConfirmationCode) -> Result<(), Error>;

    async fn resend_confirmation_code(&self, username: String) -> Result<(), Error>;

    async fn sign_in(&self, credentials: Credentials) -> Result<AuthTokens, Error>;

    async fn forgot_password(&self, username: String) -> Result<(), Error>;

    async fn reset_password(&self, reset: PasswordReset) -> Result<(), Error>;
}
