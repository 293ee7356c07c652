//! `UserRepository` backed by a [`DocumentStore`] users table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use super::document_store::{
    Document, DocumentStore, DocumentUpdate, StoreError, from_document, to_document,
};
use crate::domain::ports::{UserRepository, UserRepositoryError};
use crate::domain::{
    FieldPatch, ListEntry, Page, PageRequest, UserId, UserList, UserProfile, Username,
};

/// Attribute carrying the username, indexed for exact-match lookups.
pub const USERNAME_ATTRIBUTE: &str = "username";
const VIEW_COUNTER: &str = "view";

/// Document-store implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DocumentUserRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentUserRepository {
    /// Create a repository over the users table.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

/// Map store failures; `ConditionFailed` means the record was absent.
fn map_store_error(id: &UserId, error: StoreError) -> UserRepositoryError {
    debug!(%error, user_id = %id, "user store operation failed");
    match error {
        StoreError::Connection { message } => UserRepositoryError::connection(message),
        StoreError::Request { message } | StoreError::Malformed { message } => {
            UserRepositoryError::query(message)
        }
        StoreError::ConditionFailed => UserRepositoryError::not_found(id.to_string()),
        StoreError::InvalidContinuation { message } => UserRepositoryError::invalid_cursor(message),
    }
}

fn map_read_error(error: StoreError) -> UserRepositoryError {
    match error {
        StoreError::Connection { message } => UserRepositoryError::connection(message),
        StoreError::InvalidContinuation { message } => UserRepositoryError::invalid_cursor(message),
        other => UserRepositoryError::query(other.to_string()),
    }
}

fn decode(document: Document) -> Result<UserProfile, UserRepositoryError> {
    from_document(document).map_err(map_read_error)
}

impl DocumentUserRepository {
    async fn apply(
        &self,
        id: &UserId,
        update: DocumentUpdate,
    ) -> Result<UserProfile, UserRepositoryError> {
        let document = self
            .store
            .update(&id.to_string(), update)
            .await
            .map_err(|err| map_store_error(id, err))?;
        decode(document)
    }
}

#[async_trait]
impl UserRepository for DocumentUserRepository {
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserRepositoryError> {
        let document = to_document(profile).map_err(map_read_error)?;
        self.store
            .put_new(document)
            .await
            .map_err(|err| match err {
                StoreError::ConditionFailed => UserRepositoryError::conflict(profile.id.to_string()),
                other => map_store_error(&profile.id, other),
            })
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError> {
        self.store
            .get(&id.to_string())
            .await
            .map_err(map_read_error)?
            .map(decode)
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserProfile>, UserRepositoryError> {
        self.store
            .query_index(USERNAME_ATTRIBUTE, username.as_ref())
            .await
            .map_err(map_read_error)?
            .into_iter()
            .next()
            .map(decode)
            .transpose()
    }

    async fn list(&self, request: &PageRequest) -> Result<Page<UserProfile>, UserRepositoryError> {
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
        id: &UserId,
        patch: &FieldPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<UserProfile, UserRepositoryError> {
        let update = patch
            .assignments()
            .fold(DocumentUpdate::touch(updated_at), |update, (name, value)| {
                update.set(name, value.clone())
            });
        self.apply(id, update).await
    }

    async fn append(
        &self,
        id: &UserId,
        list: UserList,
        entry: &ListEntry,
        updated_at: DateTime<Utc>,
    ) -> Result<UserProfile, UserRepositoryError> {
        let item: Value = serde_json::to_value(entry)
            .map_err(|err| UserRepositoryError::query(err.to_string()))?;
        let update = DocumentUpdate::touch(updated_at).append(list.attribute(), vec![item]);
        self.apply(id, update).await
    }

    async fn increment_views(&self, id: &UserId) -> Result<u64, UserRepositoryError> {
        self.store
            .increment(&id.to_string(), VIEW_COUNTER)
            .await
            .map_err(|err| map_store_error(id, err))
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError> {
        self.store
            .delete(&id.to_string())
            .await
            .map_err(|err| map_store_error(id, err))
    }
}
