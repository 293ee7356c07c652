//! Key-value document store abstraction shared by the typed repositories.
//!
//! A [`DocumentStore`] holds one table of JSON documents keyed by a single
//! string attribute. It exposes exactly the operations the repositories need:
//! conditional put, point read, exact-match index query, paged scan,
//! conditional update returning the new document, an atomic counter and
//! conditional delete. The in-memory and DynamoDB adapters implement the
//! same contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::domain::{ContinuationKey, Page, UPDATED_AT, timestamp_value};

/// A stored document: top-level attribute name to JSON value.
pub type Document = Map<String, Value>;

/// Errors raised by document store adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The store could not be reached or timed out.
    #[error("document store unreachable: {message}")]
    Connection { message: String },

    /// The store rejected or failed the request.
    #[error("document store request failed: {message}")]
    Request { message: String },

    /// The write condition (key present or absent) did not hold.
    #[error("conditional check failed")]
    ConditionFailed,

    /// A stored document could not be converted.
    #[error("malformed document: {message}")]
    Malformed { message: String },

    /// A scan continuation key does not name this table's key attribute.
    #[error("invalid continuation key: {message}")]
    InvalidContinuation { message: String },
}

impl StoreError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a request error with the given message.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
        }
    }

    /// Create a malformed-document error with the given message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    /// Create an invalid-continuation error with the given message.
    pub fn invalid_continuation(message: impl Into<String>) -> Self {
        Self::InvalidContinuation {
            message: message.into(),
        }
    }
}

/// Key value a scan resumes after.
///
/// A continuation key must hold exactly the table's key attribute as a
/// string; anything else was not produced by a previous scan.
pub(crate) fn resume_key<'a>(
    key: &'a ContinuationKey,
    key_attribute: &str,
) -> Result<&'a str, StoreError> {
    let value = key.get_str(key_attribute).ok_or_else(|| {
        StoreError::invalid_continuation(format!("missing string attribute '{key_attribute}'"))
    })?;
    if key.attributes().len() != 1 {
        return Err(StoreError::invalid_continuation(format!(
            "unexpected attributes beside '{key_attribute}'"
        )));
    }
    Ok(value)
}

/// One conditional update: top-level assignments plus an optional list
/// concatenation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentUpdate {
    set: Vec<(String, Value)>,
    append: Option<(String, Vec<Value>)>,
}

impl DocumentUpdate {
    /// Update that only bumps `updatedAt`.
    pub fn touch(updated_at: DateTime<Utc>) -> Self {
        Self {
            set: vec![(UPDATED_AT.to_owned(), timestamp_value(updated_at))],
            append: None,
        }
    }

    /// Replace the top-level attribute `name`.
    #[must_use]
    pub fn set(mut self, name: impl Into<String>, value: Value) -> Self {
        let name = name.into();
        self.set.retain(|(existing, _)| *existing != name);
        self.set.push((name, value));
        self
    }

    /// Concatenate `items` onto the list attribute `name`, treating an
    /// absent list as empty.
    #[must_use]
    pub fn append(mut self, name: impl Into<String>, items: Vec<Value>) -> Self {
        self.append = Some((name.into(), items));
        self
    }

    /// Assignments in order.
    pub fn assignments(&self) -> &[(String, Value)] {
        &self.set
    }

    /// The list concatenation, if any.
    pub fn concatenation(&self) -> Option<(&str, &[Value])> {
        self.append
            .as_ref()
            .map(|(name, items)| (name.as_str(), items.as_slice()))
    }

    /// Apply the update to an in-memory document.
    pub fn apply_to(&self, document: &mut Document) {
        for (name, value) in &self.set {
            document.insert(name.clone(), value.clone());
        }
        if let Some((name, items)) = self.concatenation() {
            let list = document
                .entry(name.to_owned())
                .or_insert_with(|| Value::Array(Vec::new()));
            match list {
                Value::Array(existing) => existing.extend(items.iter().cloned()),
                other => *other = Value::Array(items.to_vec()),
            }
        }
    }
}

/// A table of JSON documents keyed by one string attribute.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Name of the primary key attribute.
    fn key_attribute(&self) -> &str;

    /// Insert `document`, failing with `ConditionFailed` if its key exists.
    async fn put_new(&self, document: Document) -> Result<(), StoreError>;

    /// Point read by primary key.
    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError>;

    /// Every document whose `attribute` equals `value`, via a secondary
    /// index.
    async fn query_index(&self, attribute: &str, value: &str)
    -> Result<Vec<Document>, StoreError>;

    /// Up to `limit` documents following `after` in scan order.
    async fn scan(
        &self,
        limit: usize,
        after: Option<&ContinuationKey>,
    ) -> Result<Page<Document>, StoreError>;

    /// Apply `update` to an existing document, returning the new version.
    /// Fails with `ConditionFailed` if `key` is absent.
    async fn update(&self, key: &str, update: DocumentUpdate) -> Result<Document, StoreError>;

    /// Add one to the numeric attribute `counter` (absent counts as zero),
    /// returning the new value. Fails with `ConditionFailed` if `key` is
    /// absent.
    async fn increment(&self, key: &str, counter: &str) -> Result<u64, StoreError>;

    /// Remove a document, failing with `ConditionFailed` if `key` is absent.
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Serialise a domain record into a stored document.
pub(crate) fn to_document<T: Serialize>(record: &T) -> Result<Document, StoreError> {
    match serde_json::to_value(record) {
        Ok(Value::Object(document)) => Ok(document),
        Ok(other) => Err(StoreError::malformed(format!(
            "expected an object, found {other}"
        ))),
        Err(err) => Err(StoreError::malformed(err.to_string())),
    }
}

/// Deserialise a stored document into a domain record.
pub(crate) fn from_document<T: DeserializeOwned>(document: Document) -> Result<T, StoreError> {
    serde_json::from_value(Value::Object(document))
        .map_err(|err| StoreError::malformed(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn document(value: Value) -> Document {
        value.as_object().cloned().expect("object")
    }

    #[rstest]
    fn appending_to_an_absent_list_creates_it() {
        let mut doc = document(json!({ "id": "1" }));
        let update = DocumentUpdate::default().append("portfolio", vec![json!({ "title": "a" })]);

        update.apply_to(&mut doc);

        assert_eq!(doc.get("portfolio"), Some(&json!([{ "title": "a" }])));
    }

    #[rstest]
    fn appending_keeps_existing_items_in_order() {
        let mut doc = document(json!({ "id": "1", "portfolio": [1, 2] }));
        DocumentUpdate::default()
            .append("portfolio", vec![json!(3)])
            .apply_to(&mut doc);

        assert_eq!(doc.get("portfolio"), Some(&json!([1, 2, 3])));
    }

    #[rstest]
    fn assignments_replace_whole_sub_objects() {
        let mut doc = document(json!({ "basicDetails": { "firstName": "Ada", "age": 36 } }));
        DocumentUpdate::default()
            .set("basicDetails", json!({ "firstName": "Grace" }))
            .apply_to(&mut doc);

        assert_eq!(doc.get("basicDetails"), Some(&json!({ "firstName": "Grace" })));
    }

    #[rstest]
    fn setting_the_same_attribute_twice_keeps_the_last_value() {
        let update = DocumentUpdate::default()
            .set("bio", json!("a"))
            .set("bio", json!("b"));

        assert_eq!(update.assignments(), &[("bio".to_owned(), json!("b"))]);
    }

    #[rstest]
    fn touch_stamps_updated_at() {
        let at = DateTime::parse_from_rfc3339("2026-03-02T09:30:00Z")
            .expect("timestamp")
            .with_timezone(&Utc);
        let update = DocumentUpdate::touch(at);

        assert_eq!(
            update.assignments(),
            &[(UPDATED_AT.to_owned(), json!("2026-03-02T09:30:00Z"))]
        );
    }

    #[rstest]
    fn non_object_records_are_malformed() {
        let err = to_document(&vec![1, 2]).expect_err("array");
        assert!(matches!(err, StoreError::Malformed { .. }));
    }
}
