//! Driving port for casting job reads.

use async_trait::async_trait;

use crate::domain::{Application, CastingJob, CastingSearch, Error, JobId, Page, PageRequest, UserId};

/// Domain use-case port for reading casting jobs.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CastingJobQuery: Send + Sync {
    /// Fetch one job by id.
    async fn fetch_job(&self, id: &JobId) -> Result<CastingJob, Error>;

    /// One page of all jobs.
    async fn list_jobs(&self, request: PageRequest) -> Result<Page<CastingJob>, Error>;

    /// Jobs matching the search criteria, at most `limit` of them.
    async fn search_jobs(&self, search: CastingSearch) -> Result<Vec<CastingJob>, Error>;

    /// Every job posted by a recruiter.
    async fn jobs_for_recruiter(&self, recruiter_id: &UserId) -> Result<Vec<CastingJob>, Error>;

    /// Applications received by a job.
    async fn applications(&self, id: &JobId) -> Result<Vec<Application>, Error>;
}
