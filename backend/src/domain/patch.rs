//! Partial updates of stored documents.
//!
//! An update body may name any subset of an allow-list of top-level fields.
//! Each present field becomes one assignment that replaces the stored value
//! wholesale; nested objects are never merged. Unknown fields are dropped.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

use super::{Email, JobCategory, JobType, Username};

/// Attribute bumped by every patch.
pub const UPDATED_AT: &str = "updatedAt";

/// Value constraint applied to one patchable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Non-blank username, stored trimmed.
    Username,
    /// Email address, stored trimmed.
    Email,
    /// Non-blank string; `null` is rejected.
    RequiredText,
    /// String or `null`.
    Text,
    /// JSON object or `null`.
    Object,
    /// Any JSON value.
    Any,
    /// One of the job category names or `null`.
    Category,
    /// One of the job type names or `null`.
    JobType,
}

/// A field that callers may assign through an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchField {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> PatchField {
    PatchField { name, kind }
}

/// Fields a user profile update may assign.
pub const USER_PATCH_FIELDS: &[PatchField] = &[
    field("username", FieldKind::Username),
    field("email", FieldKind::Email),
    field("basicDetails", FieldKind::Object),
    field("contactDetails", FieldKind::Object),
    field("physicalStats", FieldKind::Object),
    field("skills", FieldKind::Object),
    field("bio", FieldKind::Text),
    field("profilePicture", FieldKind::Text),
    field("userType", FieldKind::Text),
];

/// Fields a casting job update may assign.
pub const CASTING_PATCH_FIELDS: &[PatchField] = &[
    field("title", FieldKind::RequiredText),
    field("description", FieldKind::Text),
    field("category", FieldKind::Category),
    field("jobType", FieldKind::JobType),
    field("location", FieldKind::Text),
    field("compensation", FieldKind::Any),
    field("deadline", FieldKind::Text),
    field("status", FieldKind::RequiredText),
];

/// Reasons an update body is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// None of the allowed fields were present.
    Empty,
    /// A present field carries a value of the wrong shape.
    InvalidField { field: &'static str, reason: String },
}

impl fmt::Display for PatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no valid fields to update"),
            Self::InvalidField { field, reason } => write!(f, "invalid {field}: {reason}"),
        }
    }
}

impl std::error::Error for PatchError {}

/// Validated set of top-level assignments.
///
/// # Examples
/// ```
/// use casting_backend::domain::{FieldPatch, USER_PATCH_FIELDS};
/// use serde_json::json;
///
/// let body = json!({ "bio": "Actor", "id": "ignored" });
/// let patch = FieldPatch::from_body(
///     body.as_object().cloned().unwrap_or_default(),
///     USER_PATCH_FIELDS,
/// )
/// .expect("valid patch");
/// assert_eq!(patch.len(), 1);
/// assert!(patch.get("id").is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldPatch {
    assignments: Vec<(&'static str, Value)>,
}

impl FieldPatch {
    /// Keep the allowed fields of `body`, validating each value.
    ///
    /// Assignments follow the order of `allowed`.
    pub fn from_body(mut body: Map<String, Value>, allowed: &[PatchField]) -> Result<Self, PatchError> {
        let mut assignments = Vec::new();
        for allowed_field in allowed {
            if let Some(value) = body.remove(allowed_field.name) {
                assignments.push((allowed_field.name, normalise(allowed_field, value)?));
            }
        }
        if assignments.is_empty() {
            return Err(PatchError::Empty);
        }
        Ok(Self { assignments })
    }

    /// Assignments in application order.
    pub fn assignments(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.assignments.iter().map(|(name, value)| (*name, value))
    }

    /// Value assigned to `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.assignments
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// Number of assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Always false for a constructed patch.
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Replace the patched top-level keys of `document` and bump
    /// `updatedAt`.
    pub fn apply_to(&self, document: &mut Map<String, Value>, updated_at: DateTime<Utc>) {
        for (name, value) in self.assignments() {
            document.insert(name.to_owned(), value.clone());
        }
        document.insert(UPDATED_AT.to_owned(), timestamp_value(updated_at));
    }
}

/// Encode a timestamp the way stored documents carry it.
pub fn timestamp_value(at: DateTime<Utc>) -> Value {
    Value::String(at.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn invalid(field: &'static str, reason: impl Into<String>) -> PatchError {
    PatchError::InvalidField {
        field,
        reason: reason.into(),
    }
}

fn normalise(allowed_field: &PatchField, value: Value) -> Result<Value, PatchError> {
    let name = allowed_field.name;
    match (allowed_field.kind, value) {
        (FieldKind::Username, Value::String(raw)) => Username::new(raw)
            .map(|u| Value::String(u.into()))
            .map_err(|err| invalid(name, err.to_string())),
        (FieldKind::Email, Value::String(raw)) => Email::new(raw)
            .map(|e| Value::String(e.into()))
            .map_err(|err| invalid(name, err.to_string())),
        (FieldKind::RequiredText, Value::String(raw)) if !raw.trim().is_empty() => {
            Ok(Value::String(raw))
        }
        (FieldKind::Username | FieldKind::Email | FieldKind::RequiredText, _) => {
            Err(invalid(name, "must be a non-empty string"))
        }
        (FieldKind::Text, value @ (Value::String(_) | Value::Null)) => Ok(value),
        (FieldKind::Text, _) => Err(invalid(name, "must be a string or null")),
        (FieldKind::Object, value @ (Value::Object(_) | Value::Null)) => Ok(value),
        (FieldKind::Object, _) => Err(invalid(name, "must be an object or null")),
        (FieldKind::Any, value) => Ok(value),
        (FieldKind::Category, Value::String(raw)) => raw
            .parse::<JobCategory>()
            .map(|_| Value::String(raw))
            .map_err(|err| invalid(name, err.to_string())),
        (FieldKind::JobType, Value::String(raw)) => raw
            .parse::<JobType>()
            .map(|_| Value::String(raw))
            .map_err(|err| invalid(name, err.to_string())),
        (FieldKind::Category | FieldKind::JobType, Value::Null) => Ok(Value::Null),
        (FieldKind::Category | FieldKind::JobType, _) => {
            Err(invalid(name, "must be a string or null"))
        }
    }
}
