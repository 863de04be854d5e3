//! Local document persistence.
//!
//! A [`Namespace`] is a flat key→string map standing in for browser local storage.
//! [`DocumentStore`] layers typed, per-kind document collections on top of it; it never
//! touches a namespace it was not handed at construction.

pub mod documents;
pub mod namespace;

use thiserror::Error;

use crate::models::DocumentKind;

pub use documents::DocumentStore;
pub use namespace::{FileNamespace, MemoryNamespace};

/// Key holding the serialized [`Session`](crate::models::session::Session).
pub const SESSION_KEY: &str = "user";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("document {id} not found in {kind} collection")]
    NotFound { kind: DocumentKind, id: String },

    #[error("document {id} already exists in {kind} collection")]
    DuplicateId { kind: DocumentKind, id: String },

    #[error("a {found} document cannot be stored in the {expected} collection")]
    KindMismatch {
        expected: DocumentKind,
        found: DocumentKind,
    },
}

/// Key-value port the store persists through. Writes must be durable when they return.
pub trait Namespace: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}
