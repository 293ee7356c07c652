//! Account service forwarding auth requests to the identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{AccountCommand, IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthTokens, ConfirmationCode, Credentials, Error, ErrorCode, PasswordReset, SignUpDetails,
    SignUpOutcome,
};

/// Use the provider's own wording, or `fallback` when it sent none.
fn provider_message(code: ErrorCode, message: String, fallback: &'static str) -> Error {
    Error::try_new(code, message).unwrap_or_else(|_| Error::new(code, fallback))
}

fn map_provider_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::UsernameExists { username } => {
            Error::conflict(format!("user {username} already exists"))
        }
        IdentityProviderError::NotAuthorized { message } => {
            provider_message(ErrorCode::Unauthorized, message, "incorrect username or password")
        }
        IdentityProviderError::UserNotConfirmed { username } => {
            Error::forbidden(format!("user {username} is not confirmed"))
        }
        IdentityProviderError::UserNotFound { username } => {
            Error::not_found(format!("user {username} not found"))
        }
        IdentityProviderError::InvalidInput { message } => {
            provider_message(
                ErrorCode::InvalidRequest,
                message,
                "identity provider rejected the request",
            )
        }
        IdentityProviderError::Connection { message } => {
            Error::internal_caused_by("identity provider unavailable", message)
        }
        IdentityProviderError::Provider { message } => {
            Error::internal_caused_by("identity provider request failed", message)
        }
    }
}

/// Account service implementing [`AccountCommand`].
#[derive(Clone)]
pub struct AccountService<P> {
    provider: Arc<P>,
}

impl<P> AccountService<P> {
    pub fn new(provider: Arc<P>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> AccountCommand for AccountService<P>
where
    P: IdentityProvider,
{
    async fn sign_up(&self, details: SignUpDetails) -> Result<SignUpOutcome, Error> {
        let outcome = self
            .provider
            .sign_up(&details)
            .await
            .map_err(map_provider_error)?;
        info!(user_sub = %outcome.user_sub, "account registered");
        Ok(outcome)
    }

    async fn confirm_sign_up(&self, code: ConfirmationCode) -> Result<(), Error> {
        self.provider
            .confirm_sign_up(&code)
            .await
            .map_err(map_provider_error)
    }

    async fn resend_confirmation_code(&self, username: String) -> Result<(), Error> {
        self.provider
            .resend_confirmation_code(&username)
            .await
            .map_err(map_provider_error)
    }

    async fn sign_in(&self, credentials: Credentials) -> Result<AuthTokens, Error> {
        self.provider
            .sign_in(&credentials)
            .await
            .map_err(map_provider_error)
    }

    async fn forgot_password(&self, username: String) -> Result<(), Error> {
        self.provider
            .forgot_password(&username)
            .await
            .map_err(map_provider_error)
    }

    async fn reset_password(&self, reset: PasswordReset) -> Result<(), Error> {
        self.provider
            .confirm_forgot_password(&reset)
            .await
            .map_err(map_provider_error)
    }
}
