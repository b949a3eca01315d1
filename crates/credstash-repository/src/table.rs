//! Backing key-value table abstraction.
//!
//! The repository speaks to its table only through [`KeyValueTable`], so the
//! DynamoDB adapter and the in-memory table are interchangeable.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::TableError;

/// A table item: attribute name to string value.
pub type Item = HashMap<String, String>;

/// Result alias for table operations.
pub type TableResult<T> = std::result::Result<T, TableError>;

/// A query against a single partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    /// Partition key value.
    pub partition: String,

    /// Attributes to return. `None` returns whole items.
    pub projection: Option<Vec<&'static str>>,

    /// Maximum number of items.
    pub limit: Option<u32>,

    /// Sort-key order; `true` is newest first.
    pub descending: bool,

    /// Require a strongly consistent read.
    pub consistent: bool,
}

impl QueryRequest {
    /// Consistent, ascending query returning whole items.
    pub fn new(partition: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            projection: None,
            limit: None,
            descending: false,
            consistent: true,
        }
    }
}

/// Capabilities the repository requires from its backing table.
///
/// Items are keyed by `(name, version)`: `name` is the partition key and
/// `version` the sort key, both compared as raw strings.
#[async_trait]
pub trait KeyValueTable: Send + Sync {
    /// Query one partition, following pagination until exhausted or `limit` is met.
    async fn query(&self, request: QueryRequest) -> TableResult<Vec<Item>>;

    /// Write `item` only if its key does not exist yet.
    ///
    /// Returns [`TableError::ConditionFailed`] when the key is occupied.
    async fn put_if_absent(&self, item: Item) -> TableResult<()>;

    /// Scan the whole table, returning only the projected attributes.
    async fn scan(&self, projection: &[&'static str]) -> TableResult<Vec<Item>>;

    /// Remove the item at `(partition, sort)`. Missing keys are not an error.
    async fn delete(&self, partition: &str, sort: &str) -> TableResult<()>;
}

#[async_trait]
impl<T: KeyValueTable + ?Sized> KeyValueTable for Arc<T> {
    async fn query(&self, request: QueryRequest) -> TableResult<Vec<Item>> {
        (**self).query(request).await
    }

    async fn put_if_absent(&self, item: Item) -> TableResult<()> {
        (**self).put_if_absent(item).await
    }

    async fn scan(&self, projection: &[&'static str]) -> TableResult<Vec<Item>> {
        (**self).scan(projection).await
    }

    async fn delete(&self, partition: &str, sort: &str) -> TableResult<()> {
        (**self).delete(partition, sort).await
    }
}

/// Keep only the projected attributes of `item`.
pub(crate) fn project(item: &Item, projection: Option<&[&'static str]>) -> Item {
    match projection {
        Some(attrs) => attrs
            .iter()
            .filter_map(|attr| item.get(*attr).map(|v| (attr.to_string(), v.clone())))
            .collect(),
        None => item.clone(),
    }
}
