//! Versioned secret storage for credstash.
//!
//! A secret is an append-only sequence of immutable [`SecretRecord`]
//! versions kept in a table keyed by `(name, version)`. Each version is
//! created exactly once through a conditional write, so concurrent writers
//! never overwrite one another; the latest version is read back with a
//! strongly consistent, newest-first query.
//!
//! Encryption of the payload happens above this crate. The
//! [`integrity`] module provides the HMAC collaborator that tags records
//! before they are stored and checks them after they are read.

pub mod dynamodb;
pub mod error;
pub mod integrity;
pub mod memory;
pub mod repository;
pub mod table;
pub mod types;
pub mod version;

pub use dynamodb::{DynamoDbTable, SetupOutcome};
pub use error::{RepositoryError, Result, TableError};
pub use integrity::{HmacSha256Verifier, IntegrityVerifier};
pub use memory::MemoryTable;
pub use repository::{SecretRepository, TableRepository};
pub use table::{Item, KeyValueTable, QueryRequest};
pub use types::{Field, SecretRecord, SelectOptions};
