//! Document store persistence adapters.
//!
//! Repositories translate between domain records and JSON documents and
//! delegate storage to a [`DocumentStore`]:
//!
//! - [`MemoryDocumentStore`] keeps tables in process for development and
//!   tests.
//! - [`DynamoStore`] talks to DynamoDB through `aws-sdk-dynamodb`.
//!
//! Both enforce the same conditional-write contract, so the repositories and
//! the services above them behave identically on either backend.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use casting_backend::outbound::persistence::{DocumentUserRepository, MemoryDocumentStore};
//!
//! let repo = DocumentUserRepository::new(Arc::new(MemoryDocumentStore::users()));
//! # let _ = repo;
//! ```

mod document_casting_repository;
mod document_store;
mod document_user_repository;
mod dynamodb;
mod memory_store;

pub use document_casting_repository::{DocumentCastingRepository, RECRUITER_ATTRIBUTE};
pub use document_store::{Document, DocumentStore, DocumentUpdate, StoreError};
pub use document_user_repository::{DocumentUserRepository, USERNAME_ATTRIBUTE};
pub use dynamodb::{DynamoStore, DynamoTable};
pub use memory_store::{CASTING_KEY, MemoryDocumentStore, USERS_KEY};
