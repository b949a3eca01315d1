//! Error types for the secret repository.

use thiserror::Error;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No version of the secret exists.
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The `(name, version)` pair is already occupied.
    #[error("Version {version} of secret {name} already exists")]
    Conflict { name: String, version: String },

    /// Failure reported by the backing table.
    #[error("Backing store error: {0}")]
    BackingStore(#[from] TableError),

    /// A retrieved record's integrity tag did not verify.
    #[error("Integrity check failed for {name} version {version}")]
    IntegrityViolation { name: String, version: String },

    /// The record is missing a required attribute.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A version token could not be interpreted.
    #[error("Invalid version token: {0}")]
    InvalidVersion(String),

    /// Integrity key material was rejected.
    #[error("Invalid integrity key: {0}")]
    InvalidKey(String),
}

/// Errors surfaced by a [`crate::table::KeyValueTable`] implementation.
#[derive(Debug, Error)]
pub enum TableError {
    /// A conditional write found the key already present.
    #[error("conditional check failed")]
    ConditionFailed,

    /// An item came back in a shape the repository cannot read.
    #[error("malformed item: {0}")]
    Malformed(String),

    /// Any other failure: network, throttling, permissions, bad request.
    #[error("{0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TableError {
    /// Wrap an arbitrary client error.
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

/// Convenience result alias for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
