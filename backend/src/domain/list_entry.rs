//! Entries stored in append-only document lists.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use uuid::Uuid;

use super::Error;

/// Keys owned by the entry itself rather than the caller.
const RESERVED_KEYS: [&str; 2] = ["id", "createdAt"];

/// A list item with a generated identifier and creation timestamp.
///
/// All caller-supplied fields are kept verbatim next to `id` and
/// `createdAt`. Caller values for those two keys are discarded.
///
/// # Examples
/// ```
/// use casting_backend::domain::ListEntry;
/// use chrono::Utc;
/// use serde_json::json;
///
/// let fields = json!({ "id": "spoofed", "title": "Lead" });
/// let entry = ListEntry::new(fields.as_object().cloned().unwrap_or_default(), Utc::now());
/// assert_eq!(entry.field_str("title"), Some("Lead"));
/// assert_ne!(entry.id.to_string(), "spoofed");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ListEntry {
    /// Wrap caller fields with a fresh id and timestamp.
    pub fn new(fields: Map<String, Value>, now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), fields, now)
    }

    /// Wrap caller fields with an explicit id.
    ///
    /// Used when one logical item is written to two lists and both copies
    /// must share an identifier.
    pub fn with_id(id: Uuid, mut fields: Map<String, Value>, now: DateTime<Utc>) -> Self {
        for key in RESERVED_KEYS {
            fields.remove(key);
        }
        Self {
            id,
            created_at: now,
            fields,
        }
    }

    /// Read a string-valued caller field.
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// Names in `required` that are absent, `null` or blank strings in `fields`.
///
/// # Examples
/// ```
/// use casting_backend::domain::list_entry::missing_fields;
/// use serde_json::json;
///
/// let body = json!({ "name": "Sides", "url": "  " });
/// let fields = body.as_object().cloned().unwrap_or_default();
/// assert_eq!(missing_fields(&fields, &["name", "url"]), vec!["url"]);
/// ```
pub fn missing_fields<'a>(fields: &Map<String, Value>, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|key| match fields.get(*key) {
            None | Some(Value::Null) => true,
            Some(Value::String(text)) => text.trim().is_empty(),
            Some(_) => false,
        })
        .collect()
}

/// Reject `fields` when any of `required` is missing.
pub(crate) fn require_fields(
    fields: &Map<String, Value>,
    required: &[&str],
    subject: &str,
) -> Result<(), Error> {
    let missing = missing_fields(fields, required);
    if missing.is_empty() {
        return Ok(());
    }
    Err(Error::invalid_request(format!(
        "{subject} requires: {}",
        missing.join(", ")
    ))
    .with_details(json!({ "missing": missing })))
}
