//! Account API handlers delegating to the identity provider.
//!
//! ```text
//! POST /auth/signup {"username":"ada","password":"...","email":"ada@example.com"}
//! POST /auth/confirm {"username":"ada","code":"123456"}
//! POST /auth/resend-code {"username":"ada"}
//! POST /auth/login {"username":"ada","password":"..."}
//! POST /auth/forgot-password {"username":"ada"}
//! POST /auth/reset-password {"username":"ada","code":"123456","newPassword":"..."}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthTokens, ConfirmationCode, Credentials, PasswordReset, SignUpDetails, SignUpOutcome,
    account_username,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::envelope::{self, Empty, Envelope};
use crate::inbound::http::schemas::{AuthTokensSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{map_identity_validation_error, missing_field_error};

fn required(value: Option<String>, field: &'static str) -> ApiResult<String> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Request body for `POST /auth/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    #[schema(example = "ada")]
    pub username: Option<String>,
    pub password: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
}

impl TryFrom<SignUpRequest> for SignUpDetails {
    type Error = crate::domain::Error;

    fn try_from(value: SignUpRequest) -> Result<Self, Self::Error> {
        let username = required(value.username, "username")?;
        let password = required(value.password, "password")?;
        let email = required(value.email, "email")?;
        Self::try_from_parts(&username, &password, &email, value.name.as_deref())
            .map_err(map_identity_validation_error)
    }
}

/// Request body for `POST /auth/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Request body for `POST /auth/confirm`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct ConfirmRequest {
    pub username: Option<String>,
    #[schema(example = "123456")]
    pub code: Option<String>,
}

/// Request body for endpoints that only name the account.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UsernameRequest {
    pub username: Option<String>,
}

/// Request body for `POST /auth/reset-password`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub username: Option<String>,
    pub code: Option<String>,
    pub new_password: Option<String>,
}

/// `{userSub, userConfirmed}` payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    /// Identity provider subject of the new account.
    pub user_sub: String,
    pub user_confirmed: bool,
}

impl From<SignUpOutcome> for SignUpResponse {
    fn from(outcome: SignUpOutcome) -> Self {
        Self {
            user_sub: outcome.user_sub,
            user_confirmed: outcome.user_confirmed,
        }
    }
}

/// `{tokens}` payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    #[schema(value_type = AuthTokensSchema)]
    pub tokens: AuthTokens,
}

/// Register an account with the identity provider.
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account registered", body = Envelope<SignUpResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username exists", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "signUp"
)]
#[post("/auth/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let details = SignUpDetails::try_from(payload.into_inner())?;
    let outcome = state.accounts.sign_up(details).await?;
    Ok(envelope::created(
        "User registered successfully. Check your email for the confirmation code.",
        SignUpResponse::from(outcome),
    ))
}

/// Confirm a registration with the mailed code.
#[utoipa::path(
    post,
    path = "/auth/confirm",
    request_body = ConfirmRequest,
    responses(
        (status = 200, description = "Account confirmed", body = Envelope<Empty>),
        (status = 400, description = "Invalid or expired code", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "confirmSignUp"
)]
#[post("/auth/confirm")]
pub async fn confirm_sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<ConfirmRequest>,
) -> ApiResult<HttpResponse> {
    let ConfirmRequest { username, code } = payload.into_inner();
    let code = ConfirmationCode::try_from_parts(
        &required(username, "username")?,
        &required(code, "code")?,
    )
    .map_err(map_identity_validation_error)?;
    state.accounts.confirm_sign_up(code).await?;
    Ok(envelope::ok("Account confirmed successfully", Empty::default()))
}

/// Mail a fresh confirmation code.
#[utoipa::path(
    post,
    path = "/auth/resend-code",
    request_body = UsernameRequest,
    responses(
        (status = 200, description = "Code sent", body = Envelope<Empty>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resendConfirmationCode"
)]
#[post("/auth/resend-code")]
pub async fn resend_code(
    state: web::Data<HttpState>,
    payload: web::Json<UsernameRequest>,
) -> ApiResult<HttpResponse> {
    let username = account_username(&required(payload.into_inner().username, "username")?)
        .map_err(map_identity_validation_error)?;
    state.accounts.resend_confirmation_code(username).await?;
    Ok(envelope::ok(
        "Confirmation code resent successfully",
        Empty::default(),
    ))
}

/// Exchange credentials for tokens.
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = Envelope<LoginResponse>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 403, description = "Account not confirmed", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials = Credentials::try_from_parts(
        &required(username, "username")?,
        &required(password, "password")?,
    )
    .map_err(map_identity_validation_error)?;
    let tokens = state.accounts.sign_in(credentials).await?;
    Ok(envelope::ok("Login successful", LoginResponse { tokens }))
}

/// Start a password reset.
#[utoipa::path(
    post,
    path = "/auth/forgot-password",
    request_body = UsernameRequest,
    responses(
        (status = 200, description = "Reset code sent", body = Envelope<Empty>),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "forgotPassword"
)]
#[post("/auth/forgot-password")]
pub async fn forgot_password(
    state: web::Data<HttpState>,
    payload: web::Json<UsernameRequest>,
) -> ApiResult<HttpResponse> {
    let username = account_username(&required(payload.into_inner().username, "username")?)
        .map_err(map_identity_validation_error)?;
    state.accounts.forgot_password(username).await?;
    Ok(envelope::ok(
        "Password reset code sent successfully",
        Empty::default(),
    ))
}

/// Finish a password reset with the mailed code.
#[utoipa::path(
    post,
    path = "/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password reset", body = Envelope<Empty>),
        (status = 400, description = "Invalid code or password", body = ErrorSchema),
        (status = 404, description = "Unknown user", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "resetPassword"
)]
#[post("/auth/reset-password")]
pub async fn reset_password(
    state: web::Data<HttpState>,
    payload: web::Json<ResetPasswordRequest>,
) -> ApiResult<HttpResponse> {
    let ResetPasswordRequest {
        username,
        code,
        new_password,
    } = payload.into_inner();
    let reset = PasswordReset::try_from_parts(
        &required(username, "username")?,
        &required(code, "code")?,
        &required(new_password, "newPassword")?,
    )
    .map_err(map_identity_validation_error)?;
    state.accounts.reset_password(reset).await?;
    Ok(envelope::ok("Password reset successfully", Empty::default()))
}

/// Register every auth route.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(sign_up)
        .service(confirm_sign_up)
        .service(resend_code)
        .service(login)
        .service(forgot_password)
        .service(reset_password);
}
