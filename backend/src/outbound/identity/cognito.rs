//! AWS Cognito user pool adapter for the [`IdentityProvider`] port.
//!
//! The adapter talks to a public app client (no client secret) using the
//! `USER_PASSWORD_AUTH` flow. Cognito error codes are translated into
//! [`IdentityProviderError`] variants; anything unrecognised becomes
//! `Provider`.

use async_trait::async_trait;
use aws_sdk_cognitoidentityprovider::Client;
use aws_sdk_cognitoidentityprovider::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use tracing::debug;

use crate::domain::ports::{IdentityProvider, IdentityProviderError};
use crate::domain::{
    AuthTokens, ConfirmationCode, Credentials, PasswordReset, SignUpDetails, SignUpOutcome,
};

const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Cognito-backed identity provider.
#[derive(Clone)]
pub struct CognitoIdentityProvider {
    client: Client,
    client_id: String,
}

impl CognitoIdentityProvider {
    /// Wrap `client` for the app client `client_id`.
    pub fn new(client: Client, client_id: impl Into<String>) -> Self {
        Self {
            client,
            client_id: client_id.into(),
        }
    }
}

/// Translate a Cognito failure for the account `username`.
fn map_sdk_error<E, R>(username: &str, error: SdkError<E, R>) -> IdentityProviderError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    if matches!(
        error,
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_)
    ) {
        return IdentityProviderError::connection(DisplayErrorContext(&error).to_string());
    }

    let message = error
        .message()
        .filter(|message| !message.trim().is_empty())
        .map_or_else(|| DisplayErrorContext(&error).to_string(), str::to_owned);
    debug!(code = error.code(), %message, "cognito request failed");
    match error.code() {
        Some("UsernameExistsException") => IdentityProviderError::username_exists(username),
        Some("NotAuthorizedException") => IdentityProviderError::not_authorized(message),
        Some("UserNotConfirmedException") => IdentityProviderError::user_not_confirmed(username),
        Some("UserNotFoundException") => IdentityProviderError::user_not_found(username),
        Some(
            "CodeMismatchException"
            | "ExpiredCodeException"
            | "InvalidPasswordException"
            | "InvalidParameterException"
            | "LimitExceededException",
        ) => IdentityProviderError::invalid_input(message),
        _ => IdentityProviderError::provider(message),
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn sign_up(&self, details: &SignUpDetails) -> Result<SignUpOutcome, IdentityProviderError> {
        let username = details.credentials().username();
        let mut attributes = vec![
            AttributeType::builder()
                .name("email")
                .value(details.email().as_ref())
                .build()
                .map_err(|err| IdentityProviderError::invalid_input(err.to_string()))?,
        ];
        if let Some(name) = details.name() {
            attributes.push(
                AttributeType::builder()
                    .name("name")
                    .value(name)
                    .build()
                    .map_err(|err| IdentityProviderError::invalid_input(err.to_string()))?,
            );
        }

        let output = self
            .client
            .sign_up()
            .client_id(&self.client_id)
            .username(username)
            .password(details.credentials().password())
            .set_user_attributes(Some(attributes))
            .send()
            .await
            .map_err(|err| map_sdk_error(username, err))?;
        Ok(SignUpOutcome {
            user_sub: output.user_sub().to_owned(),
            user_confirmed: output.user_confirmed(),
        })
    }

    async fn confirm_sign_up(&self, code: &ConfirmationCode) -> Result<(), IdentityProviderError> {
        self.client
            .confirm_sign_up()
            .client_id(&self.client_id)
            .username(code.username())
            .confirmation_code(code.code())
            .send()
            .await
            .map_err(|err| map_sdk_error(code.username(), err))?;
        Ok(())
    }

    async fn resend_confirmation_code(&self, username: &str) -> Result<(), IdentityProviderError> {
        self.client
            .resend_confirmation_code()
            .client_id(&self.client_id)
            .username(username)
            .send()
            .await
            .map_err(|err| map_sdk_error(username, err))?;
        Ok(())
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<AuthTokens, IdentityProviderError> {
        let username = credentials.username();
        let output = self
            .client
            .initiate_auth()
            .client_id(&self.client_id)
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .auth_parameters("USERNAME", username)
            .auth_parameters("PASSWORD", credentials.password())
            .send()
            .await
            .map_err(|err| map_sdk_error(username, err))?;

        let Some(result) = output.authentication_result() else {
            let challenge = output
                .challenge_name()
                .map_or("unknown", |name| name.as_str());
            return Err(IdentityProviderError::not_authorized(format!(
                "additional challenge required: {challenge}"
            )));
        };
        let (Some(access_token), Some(id_token)) = (result.access_token(), result.id_token())
        else {
            return Err(IdentityProviderError::provider(
                "authentication result is missing tokens",
            ));
        };
        Ok(AuthTokens {
            access_token: access_token.to_owned(),
            id_token: id_token.to_owned(),
            refresh_token: result.refresh_token().map(str::to_owned),
            expires_in: result.expires_in(),
            token_type: result
                .token_type()
                .unwrap_or(DEFAULT_TOKEN_TYPE)
                .to_owned(),
        })
    }

    async fn forgot_password(&self, username: &str) -> Result<(), IdentityProviderError> {
        self.client
            .forgot_password()
            .client_id(&self.client_id)
            .username(username)
            .send()
            .await
            .map_err(|err| map_sdk_error(username, err))?;
        Ok(())
    }

    async fn confirm_forgot_password(
        &self,
        reset: &PasswordReset,
    ) -> Result<(), IdentityProviderError> {
        self.client
            .confirm_forgot_password()
            .client_id(&self.client_id)
            .username(reset.username())
            .confirmation_code(reset.code())
            .password(reset.new_password())
            .send()
            .await
            .map_err(|err| map_sdk_error(reset.username(), err))?;
        Ok(())
    }
}
