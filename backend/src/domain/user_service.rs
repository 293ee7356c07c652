//! User profile domain service.
//!
//! Implements the profile driving ports on top of [`UserRepository`]. Each
//! operation is at most a couple of reads followed by one conditional write;
//! the username check in particular is a plain index read and can race with
//! a concurrent create.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use pagination::PageLimit;
use serde_json::{Map, Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::list_entry::require_fields;
use crate::domain::page::invalid_cursor_error;
use crate::domain::ports::{
    AppendedEntry, UserProfileCommand, UserProfileQuery, UserRepository, UserRepositoryError,
};
use crate::domain::{
    Error, FieldPatch, ListEntry, NewUserProfile, Page, PageRequest, UserId, UserList,
    UserProfile, UserSearch, Username,
};

/// Status written on both copies of a new connection request.
const PENDING: &str = "pending";

pub(super) fn map_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::internal_caused_by("user store unavailable", message)
        }
        UserRepositoryError::Query { message } => {
            Error::internal_caused_by("user store request failed", message)
        }
        UserRepositoryError::InvalidCursor { message } => invalid_cursor_error(message),
        UserRepositoryError::Conflict { id } => Error::conflict(format!("user {id} already exists")),
        UserRepositoryError::NotFound { id } => Error::not_found(format!("user {id} not found")),
    }
}

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user {id} not found"))
}

fn username_taken(username: &Username) -> Error {
    Error::conflict(format!("username '{username}' is already taken"))
        .with_details(json!({ "field": "username" }))
}

/// User profile service implementing the command and query driving ports.
#[derive(Clone)]
pub struct UserProfileService<R> {
    user_repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> UserProfileService<R> {
    /// Create a service over the user repository.
    ///
    /// ```rust,no_run
    /// # use std::sync::Arc;
    /// # use casting_backend::domain::UserProfileService;
    /// # use casting_backend::outbound::persistence::{DocumentUserRepository, MemoryDocumentStore};
    /// # use mockable::DefaultClock;
    /// let repo = DocumentUserRepository::new(Arc::new(MemoryDocumentStore::users()));
    /// let service = UserProfileService::new(Arc::new(repo), Arc::new(DefaultClock));
    /// ```
    pub fn new(user_repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { user_repo, clock }
    }
}

impl<R> UserProfileService<R>
where
    R: UserRepository,
{
    async fn load(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.user_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| user_not_found(id))
    }

    /// Fail with a conflict when `username` belongs to anyone but `owner`.
    async fn ensure_username_free(
        &self,
        username: &Username,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        let existing = self
            .user_repo
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?;
        match existing {
            Some(profile) if Some(&profile.id) != owner => {
                info!(username = %username, holder = %profile.id, "username already taken");
                Err(username_taken(username))
            }
            _ => Ok(()),
        }
    }

    async fn append_entry(
        &self,
        id: &UserId,
        list: UserList,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error> {
        let now = self.clock.utc();
        let entry = ListEntry::new(fields, now);
        let profile = self
            .user_repo
            .append(id, list, &entry, now)
            .await
            .map_err(map_repository_error)?;
        Ok(AppendedEntry { entry, profile })
    }
}

#[async_trait]
impl<R> UserProfileCommand for UserProfileService<R>
where
    R: UserRepository,
{
    async fn create_profile(&self, draft: NewUserProfile) -> Result<UserProfile, Error> {
        self.ensure_username_free(&draft.username, None).await?;
        let profile = UserProfile::create(draft, self.clock.utc());
        self.user_repo
            .insert(&profile)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %profile.id, "user profile created");
        Ok(profile)
    }

    async fn update_profile(&self, id: &UserId, patch: FieldPatch) -> Result<UserProfile, Error> {
        if let Some(raw) = patch.get("username").and_then(Value::as_str) {
            let username = Username::new(raw)
                .map_err(|err| Error::invalid_request(format!("invalid username: {err}")))?;
            self.ensure_username_free(&username, Some(id)).await?;
        }
        self.user_repo
            .update_fields(id, &patch, self.clock.utc())
            .await
            .map_err(map_repository_error)
    }

    async fn delete_profile(&self, id: &UserId) -> Result<(), Error> {
        self.user_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        info!(user_id = %id, "user profile deleted");
        Ok(())
    }

    async fn record_view(&self, id: &UserId) -> Result<u64, Error> {
        self.user_repo
            .increment_views(id)
            .await
            .map_err(map_repository_error)
    }

    async fn add_work_experience(
        &self,
        id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error> {
        require_fields(&fields, &["title"], "work experience")?;
        self.append_entry(id, UserList::WorkExperience, fields).await
    }

    async fn add_portfolio_item(
        &self,
        id: &UserId,
        fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error> {
        require_fields(&fields, &["title"], "portfolio item")?;
        self.append_entry(id, UserList::Portfolio, fields).await
    }

    async fn add_connection(
        &self,
        id: &UserId,
        target: &UserId,
        mut fields: Map<String, Value>,
    ) -> Result<AppendedEntry, Error> {
        if id == target {
            return Err(Error::invalid_request("a user cannot connect to themselves"));
        }
        let profile = self.load(id).await?;
        self.load(target).await?;
        if profile.is_connected_to(target) {
            return Err(Error::conflict(format!(
                "user {id} is already connected to {target}"
            )));
        }
        fields.insert("userId".to_owned(), Value::String(target.to_string()));
        self.append_entry(id, UserList::Connections, fields).await
    }

    async fn send_connection_request(
        &self,
        sender: &UserId,
        receiver: &UserId,
        fields: Map<String, Value>,
    ) -> Result<ListEntry, Error> {
        if sender == receiver {
            return Err(Error::invalid_request(
                "a user cannot send a connection request to themselves",
            ));
        }
        let sender_profile = self.load(sender).await?;
        self.load(receiver).await?;

        let receiver_key = receiver.to_string();
        let already_requested = sender_profile
            .connection_requests_sent
            .iter()
            .any(|entry| entry.field_str("toUserId") == Some(receiver_key.as_str()));
        if already_requested || sender_profile.is_connected_to(receiver) {
            return Err(Error::conflict(format!(
                "a connection request from {sender} to {receiver} already exists"
            )));
        }

        let now = self.clock.utc();
        let request_id = Uuid::new_v4();
        let mut sent_fields = fields.clone();
        sent_fields.insert("toUserId".to_owned(), Value::String(receiver_key));
        sent_fields.insert("status".to_owned(), Value::String(PENDING.to_owned()));
        let mut received_fields = fields;
        received_fields.insert("fromUserId".to_owned(), Value::String(sender.to_string()));
        received_fields.insert("status".to_owned(), Value::String(PENDING.to_owned()));
        let sent = ListEntry::with_id(request_id, sent_fields, now);
        let received = ListEntry::with_id(request_id, received_fields, now);

        self.user_repo
            .append(sender, UserList::ConnectionRequestsSent, &sent, now)
            .await
            .map_err(map_repository_error)?;
        if let Err(error) = self
            .user_repo
            .append(receiver, UserList::ConnectionRequestsReceived, &received, now)
            .await
        {
            warn!(
                %error,
                sender = %sender,
                receiver = %receiver,
                request_id = %request_id,
                "connection request recorded for sender only"
            );
            return Err(map_repository_error(error));
        }
        Ok(sent)
    }
}

#[async_trait]
impl<R> UserProfileQuery for UserProfileService<R>
where
    R: UserRepository,
{
    async fn fetch_profile(&self, id: &UserId) -> Result<UserProfile, Error> {
        self.load(id).await
    }

    async fn fetch_by_username(&self, username: &Username) -> Result<UserProfile, Error> {
        self.user_repo
            .find_by_username(username)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("user '{username}' not found")))
    }

    async fn list_profiles(&self, request: PageRequest) -> Result<Page<UserProfile>, Error> {
        self.user_repo
            .list(&request)
            .await
            .map_err(map_repository_error)
    }

    async fn search_profiles(&self, search: UserSearch) -> Result<Vec<UserProfile>, Error> {
        let limit = search.limit().get();
        let mut request = PageRequest::first(PageLimit::MAX);
        let mut matches = Vec::new();
        loop {
            let page = self
                .user_repo
                .list(&request)
                .await
                .map_err(map_repository_error)?;
            matches.extend(page.items.into_iter().filter(|p| search.matches(p)));
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
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
