//! Casting job domain service.
//!
//! Applying to a job touches two documents: the job's `applications` list
//! and the applicant's `appliedJobs` list. The second write is best effort;
//! a failure there is logged and the application still stands.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageLimit;
use serde_json::{Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::list_entry::require_fields;
use crate::domain::page::invalid_cursor_error;
use crate::domain::ports::{
    CastingJobCommand, CastingJobQuery, CastingRepository, CastingRepositoryError,
    UserRepository,
};
use crate::domain::user_service::map_repository_error as map_user_error;
use crate::domain::{
    Application, ApplicationStatus, CastingJob, CastingSearch, Error, FieldPatch, JobId, JobList,
    ListEntry, NewCastingJob, Page, PageRequest, UserId, UserList,
};

fn map_repository_error(error: CastingRepositoryError) -> Error {
    match error {
        CastingRepositoryError::Connection { message } => {
            Error::internal_caused_by("casting store unavailable", message)
        }
        CastingRepositoryError::Query { message } => {
            Error::internal_caused_by("casting store request failed", message)
        }
        CastingRepositoryError::InvalidCursor { message } => invalid_cursor_error(message),
        CastingRepositoryError::Conflict { id } => {
            Error::conflict(format!("casting job {id} already exists"))
        }
        CastingRepositoryError::NotFound { id } => {
            Error::not_found(format!("casting job {id} not found"))
        }
    }
}

fn job_not_found(id: &JobId) -> Error {
    Error::not_found(format!("casting job {id} not found"))
}

/// Casting job service implementing the command and query driving ports.
#[derive(Clone)]
pub struct CastingJobService<C, U> {
    casting_repo: Arc<C>,
    user_repo: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<C, U> CastingJobService<C, U> {
    /// Create a service over the casting and user repositories.
    pub fn new(casting_repo: Arc<C>, user_repo: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self {
            casting_repo,
            user_repo,
            clock,
        }
    }
}

impl<C, U> CastingJobService<C, U>
where
    C: CastingRepository,
    U: UserRepository,
{
    async fn load(&self, id: &JobId) -> Result<CastingJob, Error> {
        self.casting_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| job_not_found(id))
    }

    async fn record_applied_job(&self, job_id: &JobId, application: &Application) {
        let mut fields = Map::new();
        fields.insert("jobId".to_owned(), Value::String(job_id.to_string()));
        fields.insert(
            "applicationId".to_owned(),
            Value::String(application.id.to_string()),
        );
        let entry = ListEntry::new(fields, application.applied_at);
        if let Err(error) = self
            .user_repo
            .append(
                &application.user_id,
                UserList::AppliedJobs,
                &entry,
                application.applied_at,
            )
            .await
        {
            warn!(
                %error,
                job_id = %job_id,
                user_id = %application.user_id,
                "failed to record applied job on user profile"
            );
        }
    }
}

#[async_trait]
impl<C, U> CastingJobCommand for CastingJobService<C, U>
where
    C: CastingRepository,
    U: UserRepository,
{
    async fn create_job(&self, draft: NewCastingJob) -> Result<CastingJob, Error> {
        let job = CastingJob::create(draft, self.clock.utc());
        self.casting_repo
            .insert(&job)
            .await
            .map_err(map_repository_error)?;
        info!(job_id = %job.job_id, recruiter_id = %job.recruiter_id, "casting job created");
        Ok(job)
    }

    async fn update_job(&self, id: &JobId, patch: FieldPatch) -> Result<CastingJob, Error> {
        self.casting_repo
            .update_fields(id, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn delete_job(&self, id: &JobId) -> Result<(), Error> {
        self.casting_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        info!(job_id = %id, "casting job deleted");
        Ok(())
    }

    async fn record_view(&self, id: &JobId) -> Result<u64, Error> {
        self.casting_repo
            .increment_views(id)
            .await
            .map_err(map_repository_error)
    }

    async fn apply(
        &self,
        id: &JobId,
        user_id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<Application, Error> {
        let job = self.load(id).await?;
        self.user_repo
            .find_by_id(user_id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {user_id} not found")))?;
        if job.has_application_from(user_id) {
            info!(job_id = %id, user_id = %user_id, "duplicate application rejected");
            return Err(Error::conflict(format!(
                "user {user_id} has already applied to casting job {id}"
            )));
        }

        let now = self.clock.utc();
        let application = Application::submit(*user_id, fields, now);
        self.casting_repo
            .append_application(id, &application, now)
            .await
            .map_err(map_repository_error)?;
        self.record_applied_job(id, &application).await;
        Ok(application)
    }

    async fn update_application_status(
        &self,
        id: &JobId,
        application_id: &Uuid,
        status: ApplicationStatus,
    ) -> Result<Application, Error> {
        let mut job = self.load(id).await?;
        let now = self.clock.utc();
        let application = job
            .applications
            .iter_mut()
            .find(|app| &app.id == application_id)
            .ok_or_else(|| {
                Error::not_found(format!(
                    "application {application_id} not found on casting job {id}"
                ))
            })?;
        application.status = status;
        application.updated_at = now;
        let updated = application.clone();

        self.casting_repo
            .replace_applications(id, &job.applications, now)
            .await
            .map_err(map_repository_error)?;
        Ok(updated)
    }

    async fn add_document(&self, id: &JobId, fields: Map<String, Value>) -> Result<ListEntry, Error> {
        require_fields(&fields, &["name", "url"], "document")?;
        let now = self.clock.utc();
        let entry = ListEntry::new(fields, now);
        self.casting_repo
            .append_entry(id, JobList::Documents, &entry, now)
            .await
            .map_err(map_repository_error)?;
        Ok(entry)
    }

    async fn remove_document(&self, id: &JobId, document_id: &Uuid) -> Result<(), Error> {
        let job = self.load(id).await?;
        let before = job.documents.len();
        let remaining: Vec<ListEntry> = job
            .documents
            .into_iter()
            .filter(|doc| &doc.id != document_id)
            .collect();
        if remaining.len() == before {
            return Err(Error::not_found(format!(
                "document {document_id} not found on casting job {id}"
            )));
        }
        self.casting_repo
            .replace_entries(id, JobList::Documents, &remaining, self.clock.utc())
            .await
            .map_err(map_repository_error)?;
        Ok(())
    }

    async fn add_requirement(
        &self,
        id: &JobId,
        fields: Map<String, Value>,
    ) -> Result<ListEntry, Error> {
        require_fields(&fields, &["description"], "requirement")?;
        let now = self.clock.utc();
        let entry = ListEntry::new(fields, now);
        self.casting_repo
            .append_entry(id, JobList::Requirements, &entry, now)
            .await
            .map_err(map_repository_error)?;
        Ok(entry)
    }
}

#[async_trait]
impl<C, U> CastingJobQuery for CastingJobService<C, U>
where
    C: CastingRepository,
    U: UserRepository,
{
    async fn fetch_job(&self, id: &JobId) -> Result<CastingJob, Error> {
        self.load(id).await
    }

    async fn list_jobs(&self, request: PageRequest) -> Result<Page<CastingJob>, Error> {
        self.casting_repo
            .list(&request)
            .await
            .map_err(map_repository_error)
    }

    async fn search_jobs(&self, search: CastingSearch) -> Result<Vec<CastingJob>, Error> {
        let limit = search.limit().get();
        let mut request = PageRequest::first(PageLimit::MAX);
        let mut matches = Vec::new();
        loop {
            let page = self
                .casting_repo
                .list(&request)
                .await
                .map_err(map_repository_error)?;
            matches.extend(page.items.into_iter().filter(|job| search.matches(job)));
            if matches.len() >= limit {
                matches.truncate(limit);
                break;
            }
            match page.next {
                Some(next) => request.after = Some(next),
                None => break,
            }
        }
        Ok(matches)
    }

    async fn jobs_for_recruiter(&self, recruiter_id: &UserId) -> Result<Vec<CastingJob>, Error> {
        self.casting_repo
            .find_by_recruiter(recruiter_id)
            .await
            .map_err(map_repository_error)
    }

    async fn applications(&self, id: &JobId) -> Result<Vec<Application>, Error> {
        Ok(self.load(id).await?.applications)
    }
}

#[cfg(test)]
#[path = "casting_service_tests.rs"]
mod tests;
