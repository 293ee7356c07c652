//! User profile data model.
//!
//! A profile is a loosely typed document: identity fields are validated
//! newtypes while the profile sections stay as caller-supplied JSON.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use super::ListEntry;

/// Validation errors raised by user identity types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyUsername,
    EmptyEmail,
    InvalidEmail,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must contain '@'"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use casting_backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// assert!(UserId::new("not-a-uuid").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a hyphenated UUID string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for UserId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Public handle of a user; trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trim and validate a username.
    ///
    /// # Examples
    /// ```
    /// use casting_backend::domain::Username;
    ///
    /// let name = Username::new("  ada  ").expect("valid username");
    /// assert_eq!(name.as_ref(), "ada");
    /// assert!(Username::new("   ").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact address; trimmed, non-empty and containing `@`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Trim and validate an email address.
    pub fn new(value: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if !trimmed.contains('@') {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Append-only lists stored on a user profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UserList {
    WorkExperience,
    Portfolio,
    AppliedJobs,
    ConnectionRequestsSent,
    ConnectionRequestsReceived,
    Connections,
}

impl UserList {
    /// Stored attribute name of the list.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::WorkExperience => "workExperience",
            Self::Portfolio => "portfolio",
            Self::AppliedJobs => "appliedJobs",
            Self::ConnectionRequestsSent => "connectionRequestsSent",
            Self::ConnectionRequestsReceived => "connectionRequestsReceived",
            Self::Connections => "connections",
        }
    }
}

/// Stored user profile document.
///
/// `created_at` and `updated_at` are identical when the profile is first
/// written; every mutation other than a view increment bumps `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub username: Username,
    pub email: Email,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub basic_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub physical_stats: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
    #[serde(default)]
    pub view: u64,
    #[serde(default)]
    pub work_experience: Vec<ListEntry>,
    #[serde(default)]
    pub portfolio: Vec<ListEntry>,
    #[serde(default)]
    pub applied_jobs: Vec<ListEntry>,
    #[serde(default)]
    pub connection_requests_sent: Vec<ListEntry>,
    #[serde(default)]
    pub connection_requests_received: Vec<ListEntry>,
    #[serde(default)]
    pub connections: Vec<ListEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Build a fresh profile with a generated id and zeroed counters.
    pub fn create(draft: NewUserProfile, now: DateTime<Utc>) -> Self {
        Self {
            id: UserId::random(),
            username: draft.username,
            email: draft.email,
            basic_details: draft.basic_details,
            contact_details: draft.contact_details,
            physical_stats: draft.physical_stats,
            skills: draft.skills,
            bio: draft.bio,
            profile_picture: draft.profile_picture,
            user_type: draft.user_type,
            view: 0,
            work_experience: Vec::new(),
            portfolio: Vec::new(),
            applied_jobs: Vec::new(),
            connection_requests_sent: Vec::new(),
            connection_requests_received: Vec::new(),
            connections: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Borrow one of the append-only lists.
    pub fn list(&self, list: UserList) -> &[ListEntry] {
        match list {
            UserList::WorkExperience => &self.work_experience,
            UserList::Portfolio => &self.portfolio,
            UserList::AppliedJobs => &self.applied_jobs,
            UserList::ConnectionRequestsSent => &self.connection_requests_sent,
            UserList::ConnectionRequestsReceived => &self.connection_requests_received,
            UserList::Connections => &self.connections,
        }
    }

    /// Whether `other` already appears in the `connections` list.
    pub fn is_connected_to(&self, other: &UserId) -> bool {
        let other = other.to_string();
        self.connections
            .iter()
            .any(|entry| entry.field_str("userId") == Some(other.as_str()))
    }
}

/// Validated input for creating a profile.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserProfile {
    pub username: Username,
    pub email: Email,
    #[serde(default)]
    pub basic_details: Option<Value>,
    #[serde(default)]
    pub contact_details: Option<Value>,
    #[serde(default)]
    pub physical_stats: Option<Value>,
    #[serde(default)]
    pub skills: Option<Value>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub user_type: Option<String>,
}

impl NewUserProfile {
    /// Profile draft with only the required fields set.
    pub fn new(username: Username, email: Email) -> Self {
        Self {
            username,
            email,
            basic_details: None,
            contact_details: None,
            physical_stats: None,
            skills: None,
            bio: None,
            profile_picture: None,
            user_type: None,
        }
    }
}
