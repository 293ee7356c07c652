//! Casting job data model.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{ListEntry, UserId};

/// Validation errors raised by casting types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CastingValidationError {
    InvalidJobId,
    EmptyTitle,
    UnknownCategory { value: String },
    UnknownJobType { value: String },
    UnknownApplicationStatus { value: String },
}

impl fmt::Display for CastingValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidJobId => write!(f, "job id must be a valid UUID"),
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::UnknownCategory { value } => write!(
                f,
                "category '{value}' must be one of: {}",
                accepted_values(JobCategory::ALL.iter().map(|v| v.as_str()))
            ),
            Self::UnknownJobType { value } => write!(
                f,
                "jobType '{value}' must be one of: {}",
                accepted_values(JobType::ALL.iter().map(|v| v.as_str()))
            ),
            Self::UnknownApplicationStatus { value } => write!(
                f,
                "status '{value}' must be one of: {}",
                accepted_values(ApplicationStatus::ALL.iter().map(|v| v.as_str()))
            ),
        }
    }
}

impl std::error::Error for CastingValidationError {}

fn accepted_values<'a>(values: impl Iterator<Item = &'a str>) -> String {
    values.collect::<Vec<_>>().join(", ")
}

/// Stable casting job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Parse a hyphenated UUID string.
    pub fn new(id: impl AsRef<str>) -> Result<Self, CastingValidationError> {
        let raw = id.as_ref();
        if raw.trim() != raw {
            return Err(CastingValidationError::InvalidJobId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| CastingValidationError::InvalidJobId)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for JobId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Declares a closed string enum with `as_str`, `ALL` and `FromStr`.
macro_rules! string_enum {
    (
        $(#[$outer:meta])*
        pub enum $name:ident ($error:ident) {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $text)]
                $variant,
            )+
        }

        impl $name {
            /// Every accepted value in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text,)+
                }
            }
        }

        impl FromStr for $name {
            type Err = CastingValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok(Self::$variant),)+
                    other => Err(CastingValidationError::$error {
                        value: other.to_owned(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Production category of a casting job.
    pub enum JobCategory (UnknownCategory) {
        Film => "film",
        Television => "television",
        Theatre => "theatre",
        Commercial => "commercial",
        MusicVideo => "music_video",
        WebSeries => "web_series",
        Modeling => "modeling",
        VoiceOver => "voice_over",
        Other => "other",
    }
}

string_enum! {
    /// Engagement type of a casting job.
    pub enum JobType (UnknownJobType) {
        FullTime => "full_time",
        PartTime => "part_time",
        Contract => "contract",
        Freelance => "freelance",
        OneOff => "one_off",
    }
}

string_enum! {
    /// Review state of an application.
    pub enum ApplicationStatus (UnknownApplicationStatus) {
        Pending => "pending",
        Shortlisted => "shortlisted",
        Accepted => "accepted",
        Rejected => "rejected",
    }
}

/// Job status assigned when the caller does not supply one.
pub const DEFAULT_JOB_STATUS: &str = "open";

fn default_status() -> String {
    DEFAULT_JOB_STATUS.to_owned()
}

/// Append-only lists stored on a casting job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobList {
    Applications,
    RecruiterInfo,
    Requirements,
    Documents,
}

impl JobList {
    /// Stored attribute name of the list.
    pub const fn attribute(self) -> &'static str {
        match self {
            Self::Applications => "applications",
            Self::RecruiterInfo => "recruiterInfo",
            Self::Requirements => "requirements",
            Self::Documents => "documents",
        }
    }
}

/// A talent's application to a casting job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub user_id: UserId,
    pub status: ApplicationStatus,
    pub applied_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Application {
    const RESERVED_KEYS: [&'static str; 5] = ["id", "userId", "status", "appliedAt", "updatedAt"];

    /// New pending application carrying the caller's extra fields.
    pub fn submit(user_id: UserId, mut fields: Map<String, Value>, now: DateTime<Utc>) -> Self {
        for key in Self::RESERVED_KEYS {
            fields.remove(key);
        }
        Self {
            id: Uuid::new_v4(),
            user_id,
            status: ApplicationStatus::Pending,
            applied_at: now,
            updated_at: now,
            fields,
        }
    }
}

/// Stored casting job document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingJob {
    pub job_id: JobId,
    pub recruiter_id: UserId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<JobCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_type: Option<JobType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub views: u64,
    #[serde(default)]
    pub applications: Vec<Application>,
    #[serde(default)]
    pub recruiter_info: Vec<ListEntry>,
    #[serde(default)]
    pub requirements: Vec<ListEntry>,
    #[serde(default)]
    pub documents: Vec<ListEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CastingJob {
    /// Build a fresh job posting with a generated id.
    pub fn create(draft: NewCastingJob, now: DateTime<Utc>) -> Self {
        let recruiter_info = draft
            .recruiter_info
            .map(|info| vec![ListEntry::new(info, now)])
            .unwrap_or_default();
        Self {
            job_id: JobId::random(),
            recruiter_id: draft.recruiter_id,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            job_type: draft.job_type,
            location: draft.location,
            compensation: draft.compensation,
            deadline: draft.deadline,
            status: draft.status.unwrap_or_else(default_status),
            views: 0,
            applications: Vec::new(),
            recruiter_info,
            requirements: Vec::new(),
            documents: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user_id` already applied to this job.
    pub fn has_application_from(&self, user_id: &UserId) -> bool {
        self.applications.iter().any(|app| &app.user_id == user_id)
    }
}

/// Validated input for creating a job posting.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCastingJob {
    pub recruiter_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub category: Option<JobCategory>,
    pub job_type: Option<JobType>,
    pub location: Option<String>,
    pub compensation: Option<Value>,
    pub deadline: Option<String>,
    pub status: Option<String>,
    pub recruiter_info: Option<Map<String, Value>>,
}

impl NewCastingJob {
    /// Job draft with only the required fields set.
    pub fn new(recruiter_id: UserId, title: impl AsRef<str>) -> Result<Self, CastingValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(CastingValidationError::EmptyTitle);
        }
        Ok(Self {
            recruiter_id,
            title: title.to_owned(),
            description: None,
            category: None,
            job_type: None,
            location: None,
            compensation: None,
            deadline: None,
            status: None,
            recruiter_info: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("music_video", JobCategory::MusicVideo)]
    #[case("voice_over", JobCategory::VoiceOver)]
    #[case("film", JobCategory::Film)]
    fn categories_parse_from_wire_names(#[case] raw: &str, #[case] expected: JobCategory) {
        assert_eq!(raw.parse::<JobCategory>(), Ok(expected));
    }

    #[rstest]
    fn unknown_job_types_list_the_accepted_values() {
        let err = "gig".parse::<JobType>().expect_err("unknown type");
        let message = err.to_string();
        assert!(message.contains("full_time"));
        assert!(message.contains("one_off"));
    }

    #[rstest]
    fn blank_titles_are_rejected() {
        let result = NewCastingJob::new(UserId::random(), "  ");
        assert_eq!(result, Err(CastingValidationError::EmptyTitle));
    }

    #[rstest]
    fn created_jobs_default_to_open_with_recruiter_info_entry() {
        let mut draft = NewCastingJob::new(UserId::random(), "Lead role").expect("draft");
        draft.recruiter_info = json!({ "company": "Acme Films" }).as_object().cloned();
        let now = Utc::now();
        let job = CastingJob::create(draft, now);

        assert_eq!(job.status, DEFAULT_JOB_STATUS);
        assert_eq!(job.views, 0);
        assert_eq!(job.recruiter_info.len(), 1);
        assert_eq!(job.recruiter_info[0].field_str("company"), Some("Acme Films"));
        assert_eq!(job.created_at, job.updated_at);
    }

    #[rstest]
    fn submitted_applications_are_pending_and_keep_extra_fields() {
        let user = UserId::random();
        let fields = json!({ "coverLetter": "Hi", "status": "accepted" })
            .as_object()
            .cloned()
            .expect("object");
        let app = Application::submit(user, fields, Utc::now());

        assert_eq!(app.status, ApplicationStatus::Pending);
        assert_eq!(app.fields.get("coverLetter"), Some(&json!("Hi")));
        assert!(!app.fields.contains_key("status"));
        let value = serde_json::to_value(&app).expect("serialise");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["userId"], json!(user.to_string()));
    }
}
