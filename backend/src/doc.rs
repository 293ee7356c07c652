//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint from the inbound layer plus the
//! domain schema wrappers from [`crate::inbound::http::schemas`], so domain
//! types stay free of utoipa derives. Request and response payloads are
//! collected from the path annotations.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{
    ApplicationSchema, ApplicationStatusSchema, AuthTokensSchema, CastingJobSchema,
    ErrorCodeSchema, ErrorSchema, JobCategorySchema, JobTypeSchema, ListEntrySchema,
    UserProfileSchema,
};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Casting backend API",
        description = "Talent profiles, casting calls, applications and account sign-in."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::search_users,
        crate::inbound::http::users::get_user_by_username,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::users::record_user_view,
        crate::inbound::http::users::add_work_experience,
        crate::inbound::http::users::add_portfolio_item,
        crate::inbound::http::users::add_connection,
        crate::inbound::http::users::send_connection_request,
        crate::inbound::http::casting::create_job,
        crate::inbound::http::casting::list_jobs,
        crate::inbound::http::casting::search_jobs,
        crate::inbound::http::casting::jobs_for_recruiter,
        crate::inbound::http::casting::get_job,
        crate::inbound::http::casting::update_job,
        crate::inbound::http::casting::delete_job,
        crate::inbound::http::casting::record_job_view,
        crate::inbound::http::casting::apply_to_job,
        crate::inbound::http::casting::list_applications,
        crate::inbound::http::casting::update_application_status,
        crate::inbound::http::casting::add_document,
        crate::inbound::http::casting::remove_document,
        crate::inbound::http::casting::add_requirement,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::confirm_sign_up,
        crate::inbound::http::auth::resend_code,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::forgot_password,
        crate::inbound::http::auth::reset_password,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        ListEntrySchema,
        UserProfileSchema,
        CastingJobSchema,
        ApplicationSchema,
        ApplicationStatusSchema,
        JobCategorySchema,
        JobTypeSchema,
        AuthTokensSchema,
    )),
    tags(
        (name = "users", description = "Talent and recruiter profiles"),
        (name = "casting", description = "Casting calls and applications"),
        (name = "auth", description = "Account registration and sign-in"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
