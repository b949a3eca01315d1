//! Versioned secret repository.
//!
//! Defines the [`SecretRepository`] trait and [`TableRepository`], which maps
//! each operation onto exactly one request against a [`KeyValueTable`].
//! The repository holds no mutable state; concurrent writers to the same
//! `(name, version)` are arbitrated by the table's conditional put.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{RepositoryError, Result, TableError};
use crate::table::{Item, KeyValueTable, QueryRequest};
use crate::types::{
    SecretRecord, SelectOptions, ATTR_CONTENTS, ATTR_HMAC, ATTR_KEY, ATTR_NAME, ATTR_VERSION,
};

/// DynamoDB's limit on partition key size, in bytes.
const MAX_NAME_LEN: usize = 2048;

/// DynamoDB's limit on sort key size, in bytes.
const MAX_VERSION_LEN: usize = 1024;

/// Storage operations over versioned secret records.
///
/// Version tokens are opaque to the repository. Callers must supply
/// fixed-width, monotonically increasing tokens: the table orders them as
/// raw strings, so `"9"` sorts after `"10"`.
#[async_trait]
pub trait SecretRepository: Send + Sync {
    /// Records for `name`, oldest first; newest first when a limit is set.
    ///
    /// An unknown name yields an empty vector.
    async fn select(&self, name: &str, options: &SelectOptions) -> Result<Vec<SecretRecord>>;

    /// Create a new version. Fails with `Conflict` if `(name, version)` exists.
    async fn put(&self, record: &SecretRecord) -> Result<()>;

    /// Every version of every secret, carrying only `name` and `version`.
    async fn list(&self) -> Result<Vec<SecretRecord>>;

    /// Remove the version identified by `record`'s `(name, version)`.
    async fn delete(&self, record: &SecretRecord) -> Result<()>;

    /// The most recent version of `name`, read with strong consistency.
    async fn get(&self, name: &str) -> Result<SecretRecord> {
        self.select(name, &SelectOptions::new().limit(1))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    /// Version token of the most recent record, if any.
    async fn latest_version(&self, name: &str) -> Result<Option<String>> {
        let latest = self
            .select(name, &SelectOptions::identity_only().limit(1))
            .await?;
        Ok(latest.into_iter().next().map(|record| record.version))
    }

    /// Remove every version of `name`, returning how many were deleted.
    async fn delete_all(&self, name: &str) -> Result<usize> {
        let versions = self.select(name, &SelectOptions::identity_only()).await?;
        for record in &versions {
            self.delete(record).await?;
        }
        Ok(versions.len())
    }
}

/// A [`SecretRepository`] backed by a [`KeyValueTable`].
///
/// The table client is injected; tests substitute
/// [`crate::memory::MemoryTable`] for the DynamoDB adapter.
#[derive(Debug)]
pub struct TableRepository<T> {
    table: T,
}

impl<T: KeyValueTable> TableRepository<T> {
    /// Create a repository over `table`.
    pub fn new(table: T) -> Self {
        Self { table }
    }

    /// The backing table.
    pub fn table(&self) -> &T {
        &self.table
    }
}

fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(RepositoryError::InvalidRecord(
            "name must not be empty".to_string(),
        ));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(RepositoryError::InvalidRecord(format!(
            "name exceeds maximum length of {MAX_NAME_LEN} bytes"
        )));
    }
    Ok(())
}

fn validate_version(version: &str) -> Result<()> {
    if version.is_empty() {
        return Err(RepositoryError::InvalidRecord(
            "version must not be empty".to_string(),
        ));
    }
    if version.len() > MAX_VERSION_LEN {
        return Err(RepositoryError::InvalidRecord(format!(
            "version exceeds maximum length of {MAX_VERSION_LEN} bytes"
        )));
    }
    Ok(())
}

fn validate_for_put(record: &SecretRecord) -> Result<()> {
    validate_name(&record.name)?;
    validate_version(&record.version)?;
    for (attr, value) in [
        (ATTR_KEY, &record.wrapped_key),
        (ATTR_CONTENTS, &record.ciphertext),
        (ATTR_HMAC, &record.integrity_tag),
    ] {
        if value.is_empty() {
            return Err(RepositoryError::InvalidRecord(format!(
                "{attr} must be set before storing {} version {}",
                record.name, record.version
            )));
        }
    }
    Ok(())
}

fn record_to_item(record: &SecretRecord) -> Item {
    [
        (ATTR_NAME, &record.name),
        (ATTR_VERSION, &record.version),
        (ATTR_KEY, &record.wrapped_key),
        (ATTR_CONTENTS, &record.ciphertext),
        (ATTR_HMAC, &record.integrity_tag),
    ]
    .into_iter()
    .map(|(attr, value)| (attr.to_string(), value.clone()))
    .collect()
}

fn item_to_record(mut item: Item) -> SecretRecord {
    let mut take = |attr: &str| item.remove(attr).unwrap_or_default();
    SecretRecord {
        name: take(ATTR_NAME),
        version: take(ATTR_VERSION),
        wrapped_key: take(ATTR_KEY),
        ciphertext: take(ATTR_CONTENTS),
        integrity_tag: take(ATTR_HMAC),
    }
}

#[async_trait]
impl<T: KeyValueTable> SecretRepository for TableRepository<T> {
    async fn select(&self, name: &str, options: &SelectOptions) -> Result<Vec<SecretRecord>> {
        validate_name(name)?;

        let request = QueryRequest {
            partition: name.to_string(),
            projection: options.projection(),
            limit: options.limit,
            descending: options.limit.is_some(),
            consistent: true,
        };

        let items = self.table.query(request).await?;
        debug!(name, count = items.len(), limit = ?options.limit, "selected secret versions");
        Ok(items.into_iter().map(item_to_record).collect())
    }

    async fn put(&self, record: &SecretRecord) -> Result<()> {
        validate_for_put(record)?;

        match self.table.put_if_absent(record_to_item(record)).await {
            Ok(()) => {
                debug!(name = %record.name, version = %record.version, "stored secret version");
                Ok(())
            }
            Err(TableError::ConditionFailed) => {
                warn!(
                    name = %record.name,
                    version = %record.version,
                    "secret version already exists"
                );
                Err(RepositoryError::Conflict {
                    name: record.name.clone(),
                    version: record.version.clone(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<SecretRecord>> {
        let items = self.table.scan(&[ATTR_NAME, ATTR_VERSION]).await?;
        debug!(count = items.len(), "listed secret versions");
        Ok(items.into_iter().map(item_to_record).collect())
    }

    async fn delete(&self, record: &SecretRecord) -> Result<()> {
        validate_name(&record.name)?;
        validate_version(&record.version)?;

        self.table.delete(&record.name, &record.version).await?;
        debug!(name = %record.name, version = %record.version, "deleted secret version");
        Ok(())
    }
}
