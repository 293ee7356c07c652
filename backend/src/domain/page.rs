//! Paged reads over a table.

use pagination::{Cursor, CursorError, PageLimit};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::domain::Error;

/// The store's native "resume after" key, expressed as JSON attributes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContinuationKey(Map<String, Value>);

impl ContinuationKey {
    /// Wrap a key attribute map.
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self(attributes)
    }

    /// Key made of a single string attribute.
    pub fn single(name: &str, value: impl Into<String>) -> Self {
        let mut attributes = Map::new();
        attributes.insert(name.to_owned(), Value::String(value.into()));
        Self(attributes)
    }

    /// Borrow the key attributes.
    pub fn attributes(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Read a string attribute of the key.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// Encode as an opaque `lastKey` token.
    pub fn to_token(&self) -> Result<String, CursorError> {
        Cursor::new(self.clone()).encode()
    }

    /// Decode a `lastKey` token produced by [`ContinuationKey::to_token`].
    ///
    /// # Examples
    /// ```
    /// use casting_backend::domain::ContinuationKey;
    ///
    /// let key = ContinuationKey::single("id", "42");
    /// let token = key.to_token().expect("encodes");
    /// assert_eq!(ContinuationKey::from_token(&token), Ok(key));
    /// ```
    pub fn from_token(token: &str) -> Result<Self, CursorError> {
        Cursor::decode(token).map(Cursor::into_inner)
    }
}

/// Validation error for a `lastKey` that cannot resume a listing.
pub(crate) fn invalid_cursor_error(reason: impl std::fmt::Display) -> Error {
    Error::invalid_request(format!("invalid lastKey: {reason}")).with_details(json!({
        "field": "lastKey",
        "code": "invalid_cursor",
    }))
}

/// Parameters of one paged read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRequest {
    pub limit: PageLimit,
    pub after: Option<ContinuationKey>,
}

impl PageRequest {
    /// First page of `limit` records.
    pub fn first(limit: PageLimit) -> Self {
        Self { limit, after: None }
    }
}

/// One page of records plus the key to resume from.
///
/// `next` is `None` once the table is exhausted.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: Option<ContinuationKey>,
}

impl<T> Page<T> {
    /// Transform every item, keeping the continuation key.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn composite_keys_survive_a_token_round_trip() {
        let key = ContinuationKey::new(
            json!({ "jobId": "a", "recruiterId": "b" })
                .as_object()
                .cloned()
                .expect("object"),
        );
        let token = key.to_token().expect("encode");
        assert_eq!(ContinuationKey::from_token(&token), Ok(key));
    }

    #[rstest]
    fn tokens_for_non_object_payloads_are_rejected() {
        let token = Cursor::new(json!(["id"])).encode().expect("encode");
        assert!(matches!(
            ContinuationKey::from_token(&token),
            Err(CursorError::InvalidPayload { .. })
        ));
    }
}
