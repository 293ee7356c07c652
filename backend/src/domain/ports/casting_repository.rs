//! Port abstraction for casting job persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Application, CastingJob, FieldPatch, JobId, JobList, ListEntry, Page, PageRequest, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by casting repository adapters.
    pub enum CastingRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "casting repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "casting repository query failed: {message}",
        /// A paged read was asked to resume from a key this table never issued.
        InvalidCursor { message: String } => "casting repository rejected continuation key: {message}",
        /// A conditional insert found an existing record.
        Conflict { id: String } => "casting job {id} already exists",
        /// A conditional mutation found no record.
        NotFound { id: String } => "casting job {id} not found",
    }
}

/// Document store operations over the casting table.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CastingRepository: Send + Sync {
    /// Insert a new job, failing with `Conflict` when the id is taken.
    async fn insert(&self, job: &CastingJob) -> Result<(), CastingRepositoryError>;

    /// Point read by primary key.
    async fn find_by_id(&self, id: &JobId) -> Result<Option<CastingJob>, CastingRepositoryError>;

    /// Every job on the recruiter index for `recruiter_id`.
    async fn find_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<CastingJob>, CastingRepositoryError>;

    /// One page of a full table scan.
    async fn list(&self, request: &PageRequest) -> Result<Page<CastingJob>, CastingRepositoryError>;

    /// Replace the patched top-level fields and bump `updatedAt`.
    async fn update_fields(
        &self,
        id: &JobId,
        patch: &FieldPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError>;

    /// Concatenate an application onto `applications`.
    async fn append_application(
        &self,
        id: &JobId,
        application: &Application,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError>;

    /// Concatenate `entry` onto one of the entry lists.
    async fn append_entry(
        &self,
        id: &JobId,
        list: JobList,
        entry: &ListEntry,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError>;

    /// Overwrite the `applications` list.
    async fn replace_applications(
        &self,
        id: &JobId,
        applications: &[Application],
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError>;

    /// Overwrite one of the entry lists.
    async fn replace_entries(
        &self,
        id: &JobId,
        list: JobList,
        entries: &[ListEntry],
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError>;

    /// Atomically add one to the view counter, returning the new value.
    async fn increment_views(&self, id: &JobId) -> Result<u64, CastingRepositoryError>;

    /// Remove a job, failing with `NotFound` when absent.
    async fn delete(&self, id: &JobId) -> Result<(), CastingRepositoryError>;
}
