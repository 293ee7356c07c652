//! Port abstraction for user profile persistence.
use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{FieldPatch, ListEntry, Page, PageRequest, UserId, UserList, UserProfile, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A paged read was asked to resume from a key this table never issued.
        InvalidCursor { message: String } => "user repository rejected continuation key: {message}",
        /// A conditional insert found an existing record.
        Conflict { id: String } => "user {id} already exists",
        /// A conditional mutation found no record.
        NotFound { id: String } => "user {id} not found",
    }
}

/// Document store operations over the users table.
///
/// Every mutation is a single conditional write: inserts require the key to
/// be absent and updates require it to be present.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new profile, failing with `Conflict` when the id is taken.
    async fn insert(&self, profile: &UserProfile) -> Result<(), UserRepositoryError>;

    /// Point read by primary key.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// Exact-match lookup on the username index.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserProfile>, UserRepositoryError>;

    /// One page of a full table scan.
    async fn list(&self, request: &PageRequest) -> Result<Page<UserProfile>, UserRepositoryError>;

    /// Replace the patched top-level fields and bump `updatedAt`.
    async fn update_fields(
        &self,
        id: &UserId,
        patch: &FieldPatch,
        updated_at: DateTime<Utc>,
    ) -> Result<UserProfile, UserRepositoryError>;

    /// Concatenate `entry` onto `list` and bump `updatedAt`.
    async fn append(
        &self,
        id: &UserId,
        list: UserList,
        entry: &ListEntry,
        updated_at: DateTime<Utc>,
    ) -> Result<UserProfile, UserRepositoryError>;

    /// Atomically add one to the view counter, returning the new value.
    async fn increment_views(&self, id: &UserId) -> Result<u64, UserRepositoryError>;

    /// Remove a profile, failing with `NotFound` when absent.
    async fn delete(&self, id: &UserId) -> Result<(), UserRepositoryError>;
}
