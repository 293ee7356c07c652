//! `CastingRepository` backed by a [`DocumentStore`] casting table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::document_store::{
    Document, DocumentStore, DocumentUpdate, StoreError, from_document, to_document,
};
use crate::domain::ports::{CastingRepository, CastingRepositoryError};
use crate::domain::{
    Application, CastingJob, FieldPatch, JobId, JobList, ListEntry, Page, PageRequest, UserId,
};

/// Attribute carrying the recruiter id, indexed for per-recruiter listings.
pub const RECRUITER_ATTRIBUTE: &str = "recruiterId";
const APPLICATIONS_ATTRIBUTE: &str = "applications";
const VIEWS_COUNTER: &str = "views";

/// Document-store implementation of the [`CastingRepository`] port.
#[derive(Clone)]
pub struct DocumentCastingRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentCastingRepository {
    /// Create a repository over the casting table.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn apply(
        &self,
        id: &JobId,
        update: DocumentUpdate,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let document = self
            .store
            .update(&id.to_string(), update)
            .await
            .map_err(|err| map_store_error(id, err))?;
        decode(document)
    }
}

fn map_store_error(id: &JobId, error: StoreError) -> CastingRepositoryError {
    debug!(%error, job_id = %id, "casting store operation failed");
    match error {
        StoreError::Connection { message } => CastingRepositoryError::connection(message),
        StoreError::Request { message } | StoreError::Malformed { message } => {
            CastingRepositoryError::query(message)
        }
        StoreError::ConditionFailed => CastingRepositoryError::not_found(id.to_string()),
        StoreError::InvalidContinuation { message } => CastingRepositoryError::invalid_cursor(message),
    }
}

fn map_read_error(error: StoreError) -> CastingRepositoryError {
    match error {
        StoreError::Connection { message } => CastingRepositoryError::connection(message),
        StoreError::InvalidContinuation { message } => CastingRepositoryError::invalid_cursor(message),
        other => CastingRepositoryError::query(other.to_string()),
    }
}

fn decode(document: Document) -> Result<CastingJob, CastingRepositoryError> {
    from_document(document).map_err(map_read_error)
}

fn encode_items<T: Serialize>(items: &[T]) -> Result<Vec<Value>, CastingRepositoryError> {
    items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| CastingRepositoryError::query(err.to_string()))
}

#[async_trait]
impl CastingRepository for DocumentCastingRepository {
    async fn insert(&self, job: &CastingJob) -> Result<(), CastingRepositoryError> {
        let document = to_document(job).map_err(map_read_error)?;
        self.store
            .put_new(document)
            .await
            .map_err(|err| match err {
                StoreError::ConditionFailed => {
                    CastingRepositoryError::conflict(job.job_id.to_string())
                }
                other => map_store_error(&job.job_id, other),
            })
    }

    async fn find_by_id(&self, id: &JobId) -> Result<Option<CastingJob>, CastingRepositoryError> {
        self.store
            .get(&id.to_string())
            .await
            .map_err(map_read_error)?
            .map(decode)
            .transpose()
    }

    async fn find_by_recruiter(
        &self,
        recruiter_id: &UserId,
    ) -> Result<Vec<CastingJob>, CastingRepositoryError> {
        self.store
            .query_index(RECRUITER_ATTRIBUTE, &recruiter_id.to_string())
            .await
            .map_err(map_read_error)?
            .into_iter()
            .map(decode)
            .collect()
    }

    async fn list(&self, request: &PageRequest) -> Result<Page<CastingJob>, CastingRepositoryError> {
        let page = self
            .store
            .scan(request.limit.get(), request.after.as_ref())
            .await
            .map_err(map_read_error)?;
        let items = page
            .items
            .into_iter()
            .map(decode)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page {
            items,
            next: page.next,
        })
    }

    async fn update_fields(
        &self,
        id: &JobId,
        patch: &FieldPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let update = patch
            .assignments()
            .fold(DocumentUpdate::touch(updated_at), |update, (name, value)| {
                update.set(name, value.clone())
            });
        self.apply(id, update).await
    }

    async fn append_application(
        &self,
        id: &JobId,
        application: &Application,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let items = encode_items(std::slice::from_ref(application))?;
        self.apply(
            id,
            DocumentUpdate::touch(updated_at).append(APPLICATIONS_ATTRIBUTE, items),
        )
        .await
    }

    async fn append_entry(
        &self,
        id: &JobId,
        list: JobList,
        entry: &ListEntry,
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let items = encode_items(std::slice::from_ref(entry))?;
        self.apply(
            id,
            DocumentUpdate::touch(updated_at).append(list.attribute(), items),
        )
        .await
    }

    async fn replace_applications(
        &self,
        id: &JobId,
        applications: &[Application],
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let items = encode_items(applications)?;
        self.apply(
            id,
            DocumentUpdate::touch(updated_at).set(APPLICATIONS_ATTRIBUTE, Value::Array(items)),
        )
        .await
    }

    async fn replace_entries(
        &self,
        id: &JobId,
        list: JobList,
        entries: &[ListEntry],
        updated_at: DateTime<Utc>,
    ) -> Result<CastingJob, CastingRepositoryError> {
        let items = encode_items(entries)?;
        self.apply(
            id,
            DocumentUpdate::touch(updated_at).set(list.attribute(), Value::Array(items)),
        )
        .await
    }

    async fn increment_views(&self, id: &JobId) -> Result<u64, CastingRepositoryError> {
        self.store
            .increment(&id.to_string(), VIEWS_COUNTER)
            .await
            .map_err(|err| map_store_error(id, err))
    }

    async fn delete(&self, id: &JobId) -> Result<(), CastingRepositoryError> {
        self.store
            .delete(&id.to_string())
            .await
            .map_err(|err| map_store_error(id, err))
    }
}
