//! Core types for the secret repository.
//!
//! A secret is an append-only sequence of [`SecretRecord`] versions. The
//! repository never looks inside `wrapped_key`, `ciphertext` or
//! `integrity_tag`; they are produced and consumed by the encryption and
//! integrity collaborators.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Table attribute holding the secret name (partition key).
pub const ATTR_NAME: &str = "name";
/// Table attribute holding the version token (sort key).
pub const ATTR_VERSION: &str = "version";
/// Table attribute holding the wrapped data key.
pub const ATTR_KEY: &str = "key";
/// Table attribute holding the ciphertext.
pub const ATTR_CONTENTS: &str = "contents";
/// Table attribute holding the integrity tag.
pub const ATTR_HMAC: &str = "hmac";

/// One stored version of one secret.
///
/// `(name, version)` is the record's identity. Version tokens are compared
/// as raw strings by the backing table, so callers must supply fixed-width
/// tokens (see [`crate::version`]) for "latest" to mean "numerically
/// highest".
///
/// Attributes omitted by a projection are left empty.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRecord {
    /// Secret name, shared across all versions.
    pub name: String,

    /// Lexicographically sortable version token.
    pub version: String,

    /// Encrypted data-encryption key.
    pub wrapped_key: String,

    /// Encrypted secret payload.
    pub ciphertext: String,

    /// Integrity tag over the payload.
    pub integrity_tag: String,
}

impl SecretRecord {
    /// Create a fully populated record.
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        wrapped_key: impl Into<String>,
        ciphertext: impl Into<String>,
        integrity_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            wrapped_key: wrapped_key.into(),
            ciphertext: ciphertext.into(),
            integrity_tag: integrity_tag.into(),
        }
    }

    /// A record carrying only its identity, as returned by `list`.
    pub fn identity(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            ..Self::default()
        }
    }

    /// Replace the integrity tag.
    pub fn with_integrity_tag(mut self, tag: impl Into<String>) -> Self {
        self.integrity_tag = tag.into();
        self
    }

    /// True when no payload, key, or tag material is present.
    pub fn is_identity_only(&self) -> bool {
        self.wrapped_key.is_empty() && self.ciphertext.is_empty() && self.integrity_tag.is_empty()
    }
}

fn redacted(value: &str) -> &'static str {
    if value.is_empty() {
        ""
    } else {
        "[REDACTED]"
    }
}

// Key and payload material never reaches logs.
impl fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretRecord")
            .field("name", &self.name)
            .field("version", &self.version)
            .field("wrapped_key", &redacted(&self.wrapped_key))
            .field("ciphertext", &redacted(&self.ciphertext))
            .field("integrity_tag", &redacted(&self.integrity_tag))
            .finish()
    }
}

/// A record attribute that can be requested in a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Version,
    WrappedKey,
    Ciphertext,
    IntegrityTag,
}

impl Field {
    /// Every attribute, in table order.
    pub const ALL: [Field; 5] = [
        Field::Name,
        Field::Version,
        Field::WrappedKey,
        Field::Ciphertext,
        Field::IntegrityTag,
    ];

    /// Name of the backing-table attribute.
    pub fn attribute(&self) -> &'static str {
        match self {
            Self::Name => ATTR_NAME,
            Self::Version => ATTR_VERSION,
            Self::WrappedKey => ATTR_KEY,
            Self::Ciphertext => ATTR_CONTENTS,
            Self::IntegrityTag => ATTR_HMAC,
        }
    }
}

/// Options recognised by [`crate::SecretRepository::select`].
///
/// - `fields`: restrict the returned attributes.
/// - `limit`: cap the result count; also switches to newest-first order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectOptions {
    /// Attributes to fetch. `None` fetches everything.
    pub fields: Option<Vec<Field>>,

    /// Maximum number of records, newest first.
    pub limit: Option<u32>,
}

impl SelectOptions {
    /// Options fetching every attribute of every version.
    pub fn new() -> Self {
        Self::default()
    }

    /// Options fetching only `name` and `version`.
    pub fn identity_only() -> Self {
        Self::new().fields([Field::Name, Field::Version])
    }

    /// Restrict the projection.
    pub fn fields(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.fields = Some(fields.into_iter().collect());
        self
    }

    /// Cap the result count.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Attribute names to project, if restricted.
    pub fn projection(&self) -> Option<Vec<&'static str>> {
        self.fields
            .as_ref()
            .map(|fields| fields.iter().map(Field::attribute).collect())
    }
}
