//! Domain primitives, aggregates and services.
//!
//! Purpose: define the user profile and casting job documents, the rules for
//! changing them, and the services that drive the repository ports. Types
//! here stay free of HTTP and store concerns.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - UserProfile / CastingJob: stored documents.
//! - FieldPatch: validated partial update.
//! - Page / PageRequest / ContinuationKey: paged reads.
//! - UserSearch / CastingSearch: scan predicates.
//! - UserProfileService / CastingJobService / AccountService: driving port
//!   implementations.

pub mod account_service;
pub mod casting;
pub mod casting_service;
pub mod error;
pub mod identity;
pub mod list_entry;
pub mod page;
pub mod patch;
pub mod ports;
pub mod search;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::account_service::AccountService;
pub use self::casting::{
    Application, ApplicationStatus, CastingJob, CastingValidationError, DEFAULT_JOB_STATUS, JobCategory,
    JobId, JobList, JobType, NewCastingJob,
};
pub use self::casting_service::CastingJobService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    AuthTokens, ConfirmationCode, Credentials, IdentityValidationError, PasswordReset,
    SignUpDetails, SignUpOutcome, account_username,
};
pub use self::list_entry::ListEntry;
pub use self::page::{ContinuationKey, Page, PageRequest};
pub use self::patch::{
    CASTING_PATCH_FIELDS, FieldKind, FieldPatch, PatchError, PatchField, USER_PATCH_FIELDS,
    UPDATED_AT, timestamp_value,
};
pub use self::search::{CastingSearch, SearchValidationError, UserSearch, UserSearchType};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{Email, NewUserProfile, UserId, UserList, UserProfile, UserValidationError, Username};
pub use self::user_service::UserProfileService;
