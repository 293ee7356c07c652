//! Driving port for casting job mutations.

use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::{
    Application, ApplicationStatus, CastingJob, Error, FieldPatch, JobId, ListEntry, NewCastingJob,
    UserId,
};

/// Domain use-case port for changing casting jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CastingJobCommand: Send + Sync {
    /// Publish a new job.
    async fn create_job(&self, draft: NewCastingJob) -> Result<CastingJob, Error>;

    /// Apply a partial update.
    async fn update_job(&self, id: &JobId, patch: FieldPatch) -> Result<CastingJob, Error>;

    /// Delete a job.
    async fn delete_job(&self, id: &JobId) -> Result<(), Error>;

    /// Count a job view and return the new total.
    async fn record_view(&self, id: &JobId) -> Result<u64, Error>;

    /// Apply `user_id` to the job; each user may apply once.
    async fn apply(
        &self,
        id: &JobId,
        user_id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<Application, Error>;

    /// Move an application to a new review state.
    async fn update_application_status(
        &self,
        id: &JobId,
        application_id: &Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, Error>;

    /// Attach a document; `name` and `url` are required.
    async fn add_document(&self, id: &JobId, fields: Map<String, Value>) -> Result<ListEntry, Error>;

    /// Detach a document by id.
    async fn remove_document(&self, id: &JobId, document_id: &Uuid) -> Result<(), Error>;

    /// Add a requirement; `description` is required.
    async fn add_requirement(
        &self,
        id: &JobId,
        fields: Map<String, Value>,
    ) -> Result<ListEntry, Error>;
}
