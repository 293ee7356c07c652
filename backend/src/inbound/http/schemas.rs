//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. This
//! module provides the schema definitions required for OpenAPI documentation
//! using utoipa's external schema registration.
//!
//! The schema wrappers mirror the serialised shape of their domain types but
//! live in the inbound adapter layer where framework concerns belong.

use std::collections::HashMap;

use serde_json::Value;
use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error codes returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Credentials were rejected.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// The account is not allowed to perform this action yet.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The write clashes with existing state.
    #[schema(rename = "conflict")]
    Conflict,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for the failure envelope.
///
/// Failures carry `success: false` next to the machine-readable code.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Always `false` for failures.
    #[schema(example = false)]
    success: bool,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "missing required field: username")]
    message: String,
    /// Correlation identifier for tracing this error across systems.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details; for server errors, the underlying cause.
    details: Option<Value>,
}

/// OpenAPI schema for [`crate::domain::ListEntry`].
///
/// Caller-supplied fields are stored alongside the generated `id` and
/// `createdAt`.
#[derive(ToSchema)]
#[schema(as = crate::domain::ListEntry, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ListEntrySchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    /// Any further caller fields, flattened into the entry.
    #[schema(value_type = Object)]
    fields: HashMap<String, Value>,
}

/// OpenAPI schema for [`crate::domain::UserProfile`].
#[derive(ToSchema)]
#[schema(as = crate::domain::UserProfile, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserProfileSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(example = "ada")]
    username: String,
    #[schema(example = "ada@example.com")]
    email: String,
    basic_details: Option<Value>,
    contact_details: Option<Value>,
    physical_stats: Option<Value>,
    skills: Option<Value>,
    bio: Option<String>,
    profile_picture: Option<String>,
    #[schema(example = "talent")]
    user_type: Option<String>,
    /// Number of recorded profile views.
    view: u64,
    work_experience: Vec<ListEntrySchema>,
    portfolio: Vec<ListEntrySchema>,
    applied_jobs: Vec<ListEntrySchema>,
    connection_requests_sent: Vec<ListEntrySchema>,
    connection_requests_received: Vec<ListEntrySchema>,
    connections: Vec<ListEntrySchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::JobCategory`].
#[derive(ToSchema)]
#[schema(as = crate::domain::JobCategory)]
pub enum JobCategorySchema {
    #[schema(rename = "film")]
    Film,
    #[schema(rename = "television")]
    Television,
    #[schema(rename = "theatre")]
    Theatre,
    #[schema(rename = "commercial")]
    Commercial,
    #[schema(rename = "music_video")]
    MusicVideo,
    #[schema(rename = "web_series")]
    WebSeries,
    #[schema(rename = "modeling")]
    Modeling,
    #[schema(rename = "voice_over")]
    VoiceOver,
    #[schema(rename = "other")]
    Other,
}

/// OpenAPI schema for [`crate::domain::JobType`].
#[derive(ToSchema)]
#[schema(as = crate::domain::JobType)]
pub enum JobTypeSchema {
    #[schema(rename = "full_time")]
    FullTime,
    #[schema(rename = "part_time")]
    PartTime,
    #[schema(rename = "contract")]
    Contract,
    #[schema(rename = "freelance")]
    Freelance,
    #[schema(rename = "one_off")]
    OneOff,
}

/// OpenAPI schema for [`crate::domain::ApplicationStatus`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ApplicationStatus)]
pub enum ApplicationStatusSchema {
    #[schema(rename = "pending")]
    Pending,
    #[schema(rename = "shortlisted")]
    Shortlisted,
    #[schema(rename = "accepted")]
    Accepted,
    #[schema(rename = "rejected")]
    Rejected,
}

/// OpenAPI schema for [`crate::domain::Application`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Application, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ApplicationSchema {
    #[schema(value_type = String, format = Uuid)]
    id: String,
    #[schema(value_type = String, format = Uuid)]
    user_id: String,
    status: ApplicationStatusSchema,
    #[schema(value_type = String, format = DateTime)]
    applied_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
    /// Any further applicant fields, flattened into the application.
    #[schema(value_type = Object)]
    fields: HashMap<String, Value>,
}

/// OpenAPI schema for [`crate::domain::CastingJob`].
#[derive(ToSchema)]
#[schema(as = crate::domain::CastingJob, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct CastingJobSchema {
    #[schema(value_type = String, format = Uuid)]
    job_id: String,
    #[schema(value_type = String, format = Uuid)]
    recruiter_id: String,
    #[schema(example = "Lead in indie feature")]
    title: String,
    description: Option<String>,
    category: Option<JobCategorySchema>,
    job_type: Option<JobTypeSchema>,
    location: Option<String>,
    compensation: Option<Value>,
    deadline: Option<String>,
    #[schema(example = "open")]
    status: String,
    /// Number of recorded job views.
    views: u64,
    applications: Vec<ApplicationSchema>,
    recruiter_info: Vec<ListEntrySchema>,
    requirements: Vec<ListEntrySchema>,
    documents: Vec<ListEntrySchema>,
    #[schema(value_type = String, format = DateTime)]
    created_at: String,
    #[schema(value_type = String, format = DateTime)]
    updated_at: String,
}

/// OpenAPI schema for [`crate::domain::AuthTokens`].
#[derive(ToSchema)]
#[schema(as = crate::domain::AuthTokens, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AuthTokensSchema {
    access_token: String,
    id_token: String,
    refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    expires_in: i32,
    #[schema(example = "Bearer")]
    token_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ApplicationStatus, JobCategory, JobType};
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_has_expected_name() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        // utoipa replaces :: with . in schema names
        assert_eq!(ErrorCodeSchema::name(), "crate.domain.ErrorCode");
        assert!(schema_json.contains("conflict"));
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<ErrorSchema>();
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_json.contains("traceId"));
        assert!(schema_json.contains("success"));
    }

    #[test]
    fn user_profile_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<UserProfileSchema>();
        assert_eq!(UserProfileSchema::name(), "crate.domain.UserProfile");
        assert!(schema_json.contains("workExperience"));
        assert!(schema_json.contains("connectionRequestsReceived"));
    }

    #[test]
    fn casting_job_schema_uses_wire_field_names() {
        let schema_json = schema_to_json::<CastingJobSchema>();
        assert_eq!(CastingJobSchema::name(), "crate.domain.CastingJob");
        assert!(schema_json.contains("recruiterId"));
        assert!(schema_json.contains("jobId"));
    }

    #[test]
    fn enum_schemas_list_every_domain_value() {
        let categories = schema_to_json::<JobCategorySchema>();
        for category in JobCategory::ALL {
            assert!(categories.contains(category.as_str()), "{}", category.as_str());
        }
        let job_types = schema_to_json::<JobTypeSchema>();
        for job_type in JobType::ALL {
            assert!(job_types.contains(job_type.as_str()), "{}", job_type.as_str());
        }
        let statuses = schema_to_json::<ApplicationStatusSchema>();
        for status in ApplicationStatus::ALL {
            assert!(statuses.contains(status.as_str()), "{}", status.as_str());
        }
    }
}
