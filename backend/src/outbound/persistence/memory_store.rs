//! In-process [`DocumentStore`] used for local development and tests.
//!
//! Documents live in a `BTreeMap` ordered by primary key, so scans are
//! deterministic and continuation keys can resume strictly after the last
//! returned key. Writes hold the lock for the whole check-and-mutate, which
//! gives the same conditional semantics as the hosted store.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::document_store::{Document, DocumentStore, DocumentUpdate, StoreError, resume_key};
use crate::domain::{ContinuationKey, Page};

/// Primary key attribute of the users table.
pub const USERS_KEY: &str = "id";
/// Primary key attribute of the casting table.
pub const CASTING_KEY: &str = "jobId";

/// Document table held in memory.
#[derive(Debug)]
pub struct MemoryDocumentStore {
    key_attribute: String,
    documents: RwLock<BTreeMap<String, Document>>,
}

impl MemoryDocumentStore {
    /// Empty table keyed by `key_attribute`.
    pub fn new(key_attribute: impl Into<String>) -> Self {
        Self {
            key_attribute: key_attribute.into(),
            documents: RwLock::new(BTreeMap::new()),
        }
    }

    /// Empty users table.
    pub fn users() -> Self {
        Self::new(USERS_KEY)
    }

    /// Empty casting table.
    pub fn casting() -> Self {
        Self::new(CASTING_KEY)
    }

    /// Number of stored documents.
    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    /// Whether the table holds no documents.
    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    fn key_of(&self, document: &Document) -> Result<String, StoreError> {
        document
            .get(&self.key_attribute)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| {
                StoreError::malformed(format!(
                    "document is missing string key '{}'",
                    self.key_attribute
                ))
            })
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn key_attribute(&self) -> &str {
        &self.key_attribute
    }

    async fn put_new(&self, document: Document) -> Result<(), StoreError> {
        let key = self.key_of(&document)?;
        let mut documents = self.documents.write().await;
        if documents.contains_key(&key) {
            return Err(StoreError::ConditionFailed);
        }
        documents.insert(key, document);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.read().await.get(key).cloned())
    }

    async fn query_index(
        &self,
        attribute: &str,
        value: &str,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .values()
            .filter(|doc| doc.get(attribute).and_then(Value::as_str) == Some(value))
            .cloned()
            .collect())
    }

    async fn scan(
        &self,
        limit: usize,
        after: Option<&ContinuationKey>,
    ) -> Result<Page<Document>, StoreError> {
        let start = match after {
            Some(key) => Bound::Excluded(resume_key(key, &self.key_attribute)?.to_owned()),
            None => Bound::Unbounded,
        };

        let documents = self.documents.read().await;
        let mut remaining = documents.range((start, Bound::Unbounded));
        let items: Vec<Document> = remaining
            .by_ref()
            .take(limit)
            .map(|(_, doc)| doc.clone())
            .collect();
        let more = remaining.next().is_some();
        let next = match items.last() {
            Some(last) if more => Some(ContinuationKey::single(
                &self.key_attribute,
                self.key_of(last)?,
            )),
            _ => None,
        };
        Ok(Page { items, next })
    }

    async fn update(&self, key: &str, update: DocumentUpdate) -> Result<Document, StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents.get_mut(key).ok_or(StoreError::ConditionFailed)?;
        update.apply_to(document);
        Ok(document.clone())
    }

    async fn increment(&self, key: &str, counter: &str) -> Result<u64, StoreError> {
        let mut documents = self.documents.write().await;
        let document = documents.get_mut(key).ok_or(StoreError::ConditionFailed)?;
        let current = match document.get(counter) {
            None | Some(Value::Null) => 0,
            Some(value) => value.as_u64().ok_or_else(|| {
                StoreError::malformed(format!("counter '{counter}' is not a natural number"))
            })?,
        };
        let next = current.saturating_add(1);
        document.insert(counter.to_owned(), Value::from(next));
        Ok(next)
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.documents
            .write()
            .await
            .remove(key)
            .map(|_| ())
            .ok_or(StoreError::ConditionFailed)
    }
}
