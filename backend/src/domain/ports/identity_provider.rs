//! Port for the managed identity provider behind the auth endpoints.
//!
//! The provider owns passwords, confirmation codes and token issuance. The
//! fixture implementation keeps accounts in memory so the HTTP surface works
//! without a user pool.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::domain::{AuthTokens, ConfirmationCode, Credentials, PasswordReset, SignUpDetails, SignUpOutcome};

use super::define_port_error;

define_port_error! {
    /// Failures reported by identity provider adapters.
    pub enum IdentityProviderError {
        /// The username is already registered.
        UsernameExists { username: String } => "user {username} already exists",
        /// Credentials or token were rejected.
        NotAuthorized { message: String } => "not authorised: {message}",
        /// The account exists but has not been confirmed.
        UserNotConfirmed { username: String } => "user {username} is not confirmed",
        /// No account matches the username.
        UserNotFound { username: String } => "user {username} not found",
        /// A code, password or parameter was rejected.
        InvalidInput { message: String } => "{message}",
        /// The provider could not be reached.
        Connection { message: String } => "identity provider unreachable: {message}",
        /// Any other provider failure.
        Provider { message: String } => "identity provider error: {message}",
    }
}

/// Operations delegated to the user pool.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register an account; the provider mails a confirmation code.
    async fn sign_up(&self, details: &SignUpDetails) -> Result<SignUpOutcome, IdentityProviderError>;

    /// Confirm a registration with the mailed code.
    async fn confirm_sign_up(&self, code: &ConfirmationCode) -> Result<(), IdentityProviderError>;

    /// Mail a fresh confirmation code.
    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError>;

    /// Exchange credentials for tokens.
    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError>;

    /// Start a password reset; the provider mails a code.
    async fn forgot_password(&self, username: &str) -> Result<(), IdentityProviderError>;

    /// Finish a password reset.
    async fn confirm_forgot_password(&self, reset: &PasswordReset) -> Result<(), IdentityProviderError>;
}

/// Code the fixture provider "mails" for confirmations and resets.
pub const FIXTURE_CODE: &str = "123456";

struct FixtureAccount {
    sub: Uuid,
    password: Zeroizing<String>,
    confirmed: bool,
}

/// In-memory identity provider for local development and tests.
///
/// Every confirmation and reset code is [`FIXTURE_CODE`].
#[derive(Default)]
pub struct FixtureIdentityProvider {
    accounts: Mutex<HashMap<String, FixtureAccount>>,
}

impl FixtureIdentityProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_code(code: &str) -> Result<(), IdentityProviderError> {
        if code == FIXTURE_CODE {
            Ok(())
        } else {
            Err(IdentityProviderError::invalid_input("invalid verification code provided"))
        }
    }
}

#[async_trait]
impl IdentityProvider for FixtureIdentityProvider {
    async fn sign_up(&self, details: &SignUpDetails) -> Result<SignUpOutcome, IdentityProviderError> {
        let username = details.credentials().username();
        let mut accounts = self.accounts.lock().await;
        if accounts.contains_key(username) {
            return Err(IdentityProviderError::username_exists(username));
        }
        let sub = Uuid::new_v4();
        accounts.insert(
            username.to_owned(),
            FixtureAccount {
                sub,
                password: Zeroizing::new(details.credentials().password().to_owned()),
                confirmed: false,
            },
        );
        Ok(SignUpOutcome {
            user_sub: sub.to_string(),
            user_confirmed: false,
        })
    }

    async fn confirm_sign_up(&self, code: &ConfirmationCode) -> Result<(), IdentityProviderError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(code.username())
            .ok_or_else(|| IdentityProviderError::user_not_found(code.username()))?;
        Self::check_code(code.code())?;
        account.confirmed = true;
        Ok(())
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError> {
        let accounts = self.accounts.lock().await;
        match accounts.get(username) {
            None => Err(IdentityProviderError::user_not_found(username)),
            Some(account) if account.confirmed => Err(IdentityProviderError::invalid_input(
                "user is already confirmed",
            )),
            Some(_) => Ok(()),
        }
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError> {
        let accounts = self.accounts.lock().await;
        let account = accounts
            .get(credentials.username())
            .ok_or_else(|| IdentityProviderError::user_not_found(credentials.username()))?;
        if account.password.as_str() != credentials.password() {
            return Err(IdentityProviderError::not_authorized(
                "incorrect username or password",
            ));
        }
        if !account.confirmed {
            return Err(IdentityProviderError::user_not_confirmed(credentials.username()));
        }
        Ok(AuthTokens {
            access_token: format!("fixture-access-{}", account.sub),
            id_token: format!("fixture-id-{}", account.sub),
            refresh_token: Some(format!("fixture-refresh-{}", account.sub)),
            expires_in: 3600,
            token_type: "Bearer".to_owned(),
        })
    }

    async fn forgot_password(&self, username: &str) -> Result<(), IdentityProviderError> {
        let accounts = self.accounts.lock().await;
        if accounts.contains_key(username) {
            Ok(())
        } else {
            Err(IdentityProviderError::user_not_found(username))
        }
    }

    async fn confirm_forgot_password(&self, reset: &PasswordReset) -> Result<(), IdentityProviderError> {
        let mut accounts = self.accounts.lock().await;
        let account = accounts
            .get_mut(reset.username())
            .ok_or_else(|| IdentityProviderError::user_not_found(reset.username()))?;
        Self::check_code(reset.code())?;
        account.password = Zeroizing::new(reset.new_password().to_owned());
        Ok(())
    }
}
