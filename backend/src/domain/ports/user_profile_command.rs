//! Driving port for user profile mutations.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::{Error, FieldPatch, ListEntry, NewUserProfile, UserId, UserProfile};

/// A list entry together with the profile it was appended to.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendedEntry {
    pub entry: ListEntry,
    pub profile: UserProfile,
}

/// Domain use-case port for changing user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileCommand: Send + Sync {
    /// Create a profile after checking the username is free.
    async fn create_profile(&self, draft: NewUserProfile) -> Result<UserProfile, Error>;

    /// Apply a partial update, re-checking a renamed username.
    async fn update_profile(&self, id: &UserId, patch: FieldPatch) -> Result<UserProfile, Error>;

    /// Delete a profile.
    async fn delete_profile(&self, id: &UserId) -> Result<(), Error>;

    /// Count a profile view and return the new total.
    async fn record_view(&self, id: &UserId) -> Result<u64, Error>;

    /// Append a work experience entry; `title` is required.
    async fn add_work_experience(
        &self,
        id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error>;

    /// Append a portfolio item; `title` is required.
    async fn add_portfolio_item(
        &self,
        id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error>;

    /// Record `target` as a connection of `id`.
    async fn add_connection(
        &self,
        id: &UserId,
        target: &UserId,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error>;

    /// Record a pending request from `sender` to `receiver` on both
    /// profiles and return the sender's copy.
    async fn send_connection_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
        fields: Map<String, Value>,
    ) -> Result<ListEntry, Error>;
}
