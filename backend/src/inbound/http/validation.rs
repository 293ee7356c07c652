//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` error whose `details` name the
//! offending field and a stable code, so clients can highlight the input.

use pagination::PageLimit;
use serde::Deserialize;
use serde_json::{Map, Value, json};
use uuid::Uuid;

use crate::domain::page::invalid_cursor_error;
use crate::domain::{
    CastingValidationError, ContinuationKey, Error, IdentityValidationError, JobId, PageRequest,
    PatchError, SearchValidationError, UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

impl From<&'static str> for FieldName {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

fn field_error(field: FieldName, code: ErrorCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: impl Into<FieldName>) -> Error {
    let field = field.into();
    field_error(
        field,
        ErrorCode::MissingField,
        format!("missing required field: {}", field.as_str()),
    )
}

pub(crate) fn invalid_value_error(field: impl Into<FieldName>, reason: impl std::fmt::Display) -> Error {
    let field = field.into();
    field_error(
        field,
        ErrorCode::InvalidValue,
        format!("invalid {}: {reason}", field.as_str()),
    )
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    Error::invalid_request(format!("{} must be a valid UUID", field.as_str())).with_details(
        json!({
            "field": field.as_str(),
            "value": value,
            "code": ErrorCode::InvalidUuid.as_str(),
        }),
    )
}

pub(crate) fn parse_uuid(value: &str, field: impl Into<FieldName>) -> Result<Uuid, Error> {
    let field = field.into();
    Uuid::parse_str(value).map_err(|_| invalid_uuid_error(field, value))
}

pub(crate) fn parse_user_id(value: &str, field: impl Into<FieldName>) -> Result<UserId, Error> {
    parse_uuid(value, field).map(UserId::from)
}

pub(crate) fn parse_job_id(value: &str, field: impl Into<FieldName>) -> Result<JobId, Error> {
    parse_uuid(value, field).map(JobId::from)
}

/// Remove a required string field from a free-form body.
pub(crate) fn take_required_str(
    body: &mut Map<String, Value>,
    field: &'static str,
) -> Result<String, Error> {
    match body.remove(field) {
        Some(Value::String(value)) if !value.trim().is_empty() => Ok(value.trim().to_owned()),
        Some(Value::String(_) | Value::Null) | None => Err(missing_field_error(field)),
        Some(_) => Err(invalid_value_error(field, "must be a string")),
    }
}

/// `limit` and `lastKey` query parameters of list endpoints.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page size, 1 to 100. Defaults to 20.
    pub limit: Option<usize>,
    /// Opaque continuation token from a previous page.
    pub last_key: Option<String>,
}

pub(crate) fn parse_limit(limit: Option<usize>) -> Result<PageLimit, Error> {
    PageLimit::from_query(limit).map_err(|err| invalid_value_error("limit", err))
}

impl PageQuery {
    /// Validate into a page request.
    pub(crate) fn into_request(self) -> Result<PageRequest, Error> {
        let limit = parse_limit(self.limit)?;
        let after = self
            .last_key
            .filter(|token| !token.is_empty())
            .map(|token| ContinuationKey::from_token(&token).map_err(invalid_cursor_error))
            .transpose()?;
        Ok(PageRequest { limit, after })
    }
}

/// Encode the continuation key of a page for the `lastKey` response field.
pub(crate) fn encode_last_key(next: Option<&ContinuationKey>) -> Result<Option<String>, Error> {
    next.map(|key| {
        key.to_token()
            .map_err(|err| Error::internal_caused_by("failed to encode lastKey", err))
    })
    .transpose()
}

pub(crate) fn map_patch_error(err: PatchError) -> Error {
    match err {
        PatchError::Empty => Error::invalid_request("no valid fields to update"),
        PatchError::InvalidField { field, reason } => invalid_value_error(field, reason),
    }
}

pub(crate) fn map_user_validation_error(err: UserValidationError) -> Error {
    let field = match err {
        UserValidationError::InvalidId => "id",
        UserValidationError::EmptyUsername => "username",
        UserValidationError::EmptyEmail | UserValidationError::InvalidEmail => "email",
    };
    invalid_value_error(field, err)
}

pub(crate) fn map_casting_validation_error(err: CastingValidationError) -> Error {
    let field = match &err {
        CastingValidationError::InvalidJobId => "jobId",
        CastingValidationError::EmptyTitle => "title",
        CastingValidationError::UnknownCategory { .. } => "category",
        CastingValidationError::UnknownJobType { .. } => "jobType",
        CastingValidationError::UnknownApplicationStatus { .. } => "status",
    };
    invalid_value_error(field, err)
}

pub(crate) fn map_search_validation_error(err: SearchValidationError) -> Error {
    let field = match &err {
        SearchValidationError::EmptyQuery | SearchValidationError::NoFilters => "q",
        SearchValidationError::UnknownType { .. } => "type",
    };
    invalid_value_error(field, err)
}

pub(crate) fn map_identity_validation_error(err: IdentityValidationError) -> Error {
    let field = match err {
        IdentityValidationError::EmptyUsername => "username",
        IdentityValidationError::EmptyPassword => "password",
        IdentityValidationError::EmptyCode => "code",
        IdentityValidationError::InvalidEmail => "email",
    };
    invalid_value_error(field, err)
}
