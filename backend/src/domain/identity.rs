//! Identity provider request and response types.
//!
//! Sign-up, login and password recovery are delegated to a managed user
//! pool. These types validate caller input before any provider call and
//! keep secrets in zeroizing buffers.

use std::fmt;

use serde::Serialize;
use zeroize::Zeroizing;

use super::Email;

/// Validation errors for identity requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityValidationError {
    EmptyUsername,
    EmptyPassword,
    EmptyCode,
    InvalidEmail,
}

impl fmt::Display for IdentityValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyCode => write!(f, "confirmation code must not be empty"),
            Self::InvalidEmail => write!(f, "email must be a non-empty address containing '@'"),
        }
    }
}

impl std::error::Error for IdentityValidationError {}

fn username(raw: &str) -> Result<String, IdentityValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityValidationError::EmptyUsername);
    }
    Ok(trimmed.to_owned())
}

fn secret(raw: &str) -> Result<Zeroizing<String>, IdentityValidationError> {
    if raw.is_empty() {
        return Err(IdentityValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(raw.to_owned()))
}

fn code(raw: &str) -> Result<String, IdentityValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(IdentityValidationError::EmptyCode);
    }
    Ok(trimmed.to_owned())
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller whitespace.
///
/// # Examples
/// ```
/// use casting_backend::domain::Credentials;
///
/// let creds = Credentials::try_from_parts(" ada ", "s3cret!").expect("valid");
/// assert_eq!(creds.username(), "ada");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Construct credentials from raw inputs.
    pub fn try_from_parts(username_raw: &str, password: &str) -> Result<Self, IdentityValidationError> {
        Ok(Self {
            username: username(username_raw)?,
            password: secret(password)?,
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Registration request forwarded to the user pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpDetails {
    credentials: Credentials,
    email: Email,
    name: Option<String>,
}

impl SignUpDetails {
    pub fn try_from_parts(
        username_raw: &str,
        password: &str,
        email: &str,
        name: Option<&str>,
    ) -> Result<Self, IdentityValidationError> {
        let credentials = Credentials::try_from_parts(username_raw, password)?;
        let email = Email::new(email).map_err(|_| IdentityValidationError::InvalidEmail)?;
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_owned);
        Ok(Self {
            credentials,
            email,
            name,
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Username plus the one-time code mailed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationCode {
    username: String,
    code: String,
}

impl ConfirmationCode {
    pub fn try_from_parts(username_raw: &str, code_raw: &str) -> Result<Self, IdentityValidationError> {
        Ok(Self {
            username: username(username_raw)?,
            code: code(code_raw)?,
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Password reset completing a forgot-password flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordReset {
    confirmation: ConfirmationCode,
    new_password: Zeroizing<String>,
}

impl PasswordReset {
    pub fn try_from_parts(
        username_raw: &str,
        code_raw: &str,
        new_password: &str,
    ) -> Result<Self, IdentityValidationError> {
        Ok(Self {
            confirmation: ConfirmationCode::try_from_parts(username_raw, code_raw)?,
            new_password: secret(new_password)?,
        })
    }

    pub fn username(&self) -> &str {
        self.confirmation.username()
    }

    pub fn code(&self) -> &str {
        self.confirmation.code()
    }

    pub fn new_password(&self) -> &str {
        self.new_password.as_str()
    }
}

/// Validate a bare username, e.g. for code resends.
pub fn account_username(raw: &str) -> Result<String, IdentityValidationError> {
    username(raw)
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpOutcome {
    pub user_sub: String,
    pub user_confirmed: bool,
}

/// Tokens issued on login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokens {
    pub access_token: String,
    pub id_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    pub expires_in: i32,
    pub token_type: String,
}
