//! Continuation tokens encoded as URL-safe base64 JSON.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors raised while encoding or decoding a continuation token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CursorError {
    /// The supplied token was empty or only whitespace.
    #[error("continuation token must not be empty")]
    Empty,
    /// The token is not valid URL-safe base64.
    #[error("continuation token is not valid base64")]
    InvalidEncoding,
    /// The decoded bytes are not a valid key payload.
    #[error("continuation token payload is invalid: {message}")]
    InvalidPayload {
        /// Parser message describing the rejected payload.
        message: String,
    },
    /// The key could not be serialised.
    #[error("continuation key could not be serialised: {message}")]
    Serialize {
        /// Serialiser message describing the failure.
        message: String,
    },
}

/// Opaque position in a paginated read.
///
/// The wrapped key is the store's native "last evaluated" key. Encoding
/// serialises it to JSON and then to unpadded URL-safe base64 so the token
/// survives query strings without escaping.
///
/// # Examples
/// ```
/// use pagination::Cursor;
/// use serde_json::json;
///
/// let cursor = Cursor::new(json!({ "id": "42" }));
/// let token = cursor.encode().expect("encodes");
/// let decoded = Cursor::<serde_json::Value>::decode(&token).expect("decodes");
/// assert_eq!(decoded.key(), cursor.key());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cursor<K> {
    key: K,
}

impl<K> Cursor<K> {
    /// Wrap a store key.
    #[must_use]
    pub const fn new(key: K) -> Self {
        Self { key }
    }

    /// Borrow the wrapped key.
    #[must_use]
    pub const fn key(&self) -> &K {
        &self.key
    }

    /// Unwrap the store key.
    #[must_use]
    pub fn into_inner(self) -> K {
        self.key
    }
}

impl<K: Serialize> Cursor<K> {
    /// Encode the key as an opaque token.
    ///
    /// # Errors
    /// Returns [`CursorError::Serialize`] when the key cannot be written as
    /// JSON.
    pub fn encode(&self) -> Result<String, CursorError> {
        let payload = serde_json::to_vec(&self.key).map_err(|err| CursorError::Serialize {
            message: err.to_string(),
        })?;
        Ok(URL_SAFE_NO_PAD.encode(payload))
    }
}

impl<K: DeserializeOwned> Cursor<K> {
    /// Decode a token previously produced by [`Cursor::encode`].
    ///
    /// # Errors
    /// Returns [`CursorError::Empty`] for blank input,
    /// [`CursorError::InvalidEncoding`] when the token is not base64, and
    /// [`CursorError::InvalidPayload`] when the decoded JSON does not match
    /// the key type.
    pub fn decode(token: &str) -> Result<Self, CursorError> {
        if token.trim().is_empty() {
            return Err(CursorError::Empty);
        }
        let payload = URL_SAFE_NO_PAD
            .decode(token.as_bytes())
            .map_err(|_| CursorError::InvalidEncoding)?;
        let key = serde_json::from_slice(&payload).map_err(|err| CursorError::InvalidPayload {
            message: err.to_string(),
        })?;
        Ok(Self { key })
    }
}

#[cfg(test)]
mod tests {
    //! Token codec behaviour.

    use super::*;
    use rstest::rstest;
    use serde::Deserialize;
    use serde_json::{Value, json};

    #[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
    struct TableKey {
        id: String,
    }

    #[rstest]
    fn encoded_tokens_are_url_safe() -> Result<(), CursorError> {
        let cursor = Cursor::new(json!({ "id": "??>>~~", "sort": "a+b/c" }));
        let token = cursor.encode()?;
        assert!(
            token
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
        Ok(())
    }

    #[rstest]
    fn decode_restores_typed_keys() -> Result<(), CursorError> {
        let original = Cursor::new(TableKey {
            id: "3fa85f64-5717-4562-b3fc-2c963f66afa6".to_owned(),
        });
        let token = original.encode()?;
        let restored = Cursor::<TableKey>::decode(&token)?;
        assert_eq!(restored, original);
        Ok(())
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_tokens_are_rejected(#[case] token: &str) {
        assert_eq!(Cursor::<Value>::decode(token), Err(CursorError::Empty));
    }

    #[rstest]
    fn non_base64_tokens_are_rejected() {
        assert_eq!(
            Cursor::<Value>::decode("not base64!"),
            Err(CursorError::InvalidEncoding)
        );
    }

    #[rstest]
    fn payloads_of_the_wrong_shape_are_rejected() {
        let token = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
        let result = Cursor::<TableKey>::decode(&token);
        assert!(matches!(result, Err(CursorError::InvalidPayload { .. })));
    }
}
