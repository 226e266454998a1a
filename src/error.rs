//! Error types for the relational store.
//!
//! Store operations fail with exactly one of these variants; callers can
//! match on them instead of parsing messages. Idempotent deletes never
//! produce [`StoreError::NotFound`].

use thiserror::Error;

/// Errors returned by [`DocumentStore`](crate::store::DocumentStore) operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested entity id (or a foreign-key target) does not resolve.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// The request itself is malformed, e.g. an update without an id.
    #[error("{0}")]
    InvalidArgument(String),

    /// A caller-supplied document id collides with an existing one.
    #[error("document with id {id} already exists")]
    Conflict { id: String },

    /// Underlying database failure.
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn group_not_found(id: i64) -> Self {
        StoreError::NotFound {
            entity: "group",
            id: id.to_string(),
        }
    }

    pub fn document_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "document",
            id: id.to_string(),
        }
    }

    /// True for the NotFound variant, regardless of entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
