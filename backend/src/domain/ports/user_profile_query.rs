//! Driving port for user profile reads.

use async_trait::async_trait;

use crate::domain::{Error, Page, PageRequest, UserId, UserProfile, UserSearch, Username};

/// Domain use-case port for reading user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch one profile by id.
    async fn fetch_profile(&self, id: &UserId) -> Result<UserProfile, Error>;

    /// Fetch one profile by username.
    async fn fetch_by_username(&self, username: &Username) -> Result<UserProfile, Error>;

    /// One page of all profiles.
    async fn list_profiles(&self, request: PageRequest) -> Result<Page<UserProfile>, Error>;

    /// Profiles matching the search criteria, at most `limit` of them.
    async fn search_profiles(&self, search: UserSearch) -> Result<Vec<UserProfile>, Error>;
}
