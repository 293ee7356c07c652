//! Scan-and-filter search predicates.
//!
//! Neither table has a text index, so search walks the table page by page
//! and keeps the records these predicates accept. Matching is a
//! case-insensitive substring test.

use std::fmt;
use std::str::FromStr;

use pagination::PageLimit;
use serde_json::Value;

use super::{CastingJob, JobCategory, JobType, UserProfile};

/// Errors raised while building search criteria.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchValidationError {
    EmptyQuery,
    UnknownType { value: String },
    NoFilters,
}

impl fmt::Display for SearchValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyQuery => write!(f, "search query must not be empty"),
            Self::UnknownType { value } => write!(
                f,
                "search type '{value}' must be one of: all, username, name, email, location, skills"
            ),
            Self::NoFilters => write!(
                f,
                "at least one of q, category, jobType or location is required"
            ),
        }
    }
}

impl std::error::Error for SearchValidationError {}

/// Which part of a profile a user search inspects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserSearchType {
    #[default]
    All,
    Username,
    Name,
    Email,
    Location,
    Skills,
}

impl FromStr for UserSearchType {
    type Err = SearchValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "username" => Ok(Self::Username),
            "name" => Ok(Self::Name),
            "email" => Ok(Self::Email),
            "location" => Ok(Self::Location),
            "skills" => Ok(Self::Skills),
            other => Err(SearchValidationError::UnknownType {
                value: other.to_owned(),
            }),
        }
    }
}

const NAME_KEYS: [&str; 4] = ["firstName", "lastName", "fullName", "name"];

fn normalise_needle(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
}

fn text_contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Whether any string nested anywhere in `value` contains `needle`.
fn value_contains(value: &Value, needle: &str) -> bool {
    match value {
        Value::String(text) => text_contains(text, needle),
        Value::Array(items) => items.iter().any(|item| value_contains(item, needle)),
        Value::Object(map) => map.values().any(|item| value_contains(item, needle)),
        Value::Null | Value::Bool(_) | Value::Number(_) => false,
    }
}

fn object_key_contains(value: Option<&Value>, key: &str, needle: &str) -> bool {
    value
        .and_then(|v| v.get(key))
        .and_then(Value::as_str)
        .is_some_and(|text| text_contains(text, needle))
}

/// Criteria for `GET /users/search`.
#[derive(Debug, Clone, PartialEq)]
pub struct UserSearch {
    needle: String,
    kind: UserSearchType,
    limit: PageLimit,
}

impl UserSearch {
    /// Validate the query text and search type.
    ///
    /// # Examples
    /// ```
    /// use casting_backend::domain::{UserSearch, UserSearchType};
    /// use pagination::PageLimit;
    ///
    /// assert!(UserSearch::new("  ", UserSearchType::All, PageLimit::default()).is_err());
    /// ```
    pub fn new(
        query: &str,
        kind: UserSearchType,
        limit: PageLimit,
    ) -> Result<Self, SearchValidationError> {
        let needle = normalise_needle(query).ok_or(SearchValidationError::EmptyQuery)?;
        Ok(Self {
            needle,
            kind,
            limit,
        })
    }

    /// Maximum number of matches to return.
    pub fn limit(&self) -> PageLimit {
        self.limit
    }

    /// Whether `profile` satisfies the criteria.
    pub fn matches(&self, profile: &UserProfile) -> bool {
        let needle = self.needle.as_str();
        let username = || text_contains(profile.username.as_ref(), needle);
        let email = || text_contains(profile.email.as_ref(), needle);
        let name = || {
            NAME_KEYS
                .iter()
                .any(|key| object_key_contains(profile.basic_details.as_ref(), key, needle))
        };
        let location = || {
            object_key_contains(profile.basic_details.as_ref(), "location", needle)
                || profile
                    .contact_details
                    .as_ref()
                    .is_some_and(|details| value_contains(details, needle))
        };
        let skills = || {
            profile
                .skills
                .as_ref()
                .is_some_and(|skills| value_contains(skills, needle))
        };

        match self.kind {
            UserSearchType::All => username() || name() || email() || location() || skills(),
            UserSearchType::Username => username(),
            UserSearchType::Name => name(),
            UserSearchType::Email => email(),
            UserSearchType::Location => location(),
            UserSearchType::Skills => skills(),
        }
    }
}

/// Criteria for `GET /casting/search`; every supplied filter must match.
#[derive(Debug, Clone, PartialEq)]
pub struct CastingSearch {
    text: Option<String>,
    category: Option<JobCategory>,
    job_type: Option<JobType>,
    location: Option<String>,
    limit: PageLimit,
}

impl CastingSearch {
    /// Build criteria, requiring at least one filter.
    pub fn new(
        text: Option<&str>,
        category: Option<JobCategory>,
        job_type: Option<JobType>,
        location: Option<&str>,
        limit: PageLimit,
    ) -> Result<Self, SearchValidationError> {
        let text = text.and_then(normalise_needle);
        let location = location.and_then(normalise_needle);
        if text.is_none() && category.is_none() && job_type.is_none() && location.is_none() {
            return Err(SearchValidationError::NoFilters);
        }
        Ok(Self {
            text,
            category,
            job_type,
            location,
            limit,
        })
    }

    /// Maximum number of matches to return.
    pub fn limit(&self) -> PageLimit {
        self.limit
    }

    /// Whether `job` satisfies every supplied filter.
    pub fn matches(&self, job: &CastingJob) -> bool {
        let text_ok = self.text.as_deref().is_none_or(|needle| {
            text_contains(&job.title, needle)
                || job
                    .description
                    .as_deref()
                    .is_some_and(|d| text_contains(d, needle))
        });
        let location_ok = self.location.as_deref().is_none_or(|needle| {
            job.location
                .as_deref()
                .is_some_and(|l| text_contains(l, needle))
        });
        let category_ok = self.category.is_none_or(|c| job.category == Some(c));
        let job_type_ok = self.job_type.is_none_or(|t| job.job_type == Some(t));
        text_ok && location_ok && category_ok && job_type_ok
    }
}
