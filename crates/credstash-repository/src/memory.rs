//! In-memory backing table for tests and local development.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::TableError;
use crate::table::{project, Item, KeyValueTable, QueryRequest, TableResult};
use crate::types::{ATTR_NAME, ATTR_VERSION};

/// An ordered in-memory table keyed by `(name, version)`.
///
/// Sort keys are compared as raw strings, like DynamoDB does for `S`
/// attributes. The conditional put holds the write lock for its whole
/// check-and-insert, so concurrent writers to the same key see exactly one
/// success.
#[derive(Debug, Default)]
pub struct MemoryTable {
    items: RwLock<BTreeMap<(String, String), Item>>,
}

impl MemoryTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    /// True when the table holds no items.
    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

fn key_of(item: &Item) -> TableResult<(String, String)> {
    let name = item
        .get(ATTR_NAME)
        .ok_or_else(|| TableError::Malformed(format!("item is missing '{ATTR_NAME}'")))?;
    let version = item
        .get(ATTR_VERSION)
        .ok_or_else(|| TableError::Malformed(format!("item is missing '{ATTR_VERSION}'")))?;
    Ok((name.clone(), version.clone()))
}

#[async_trait]
impl KeyValueTable for MemoryTable {
    async fn query(&self, request: QueryRequest) -> TableResult<Vec<Item>> {
        let items = self.items.read().await;
        let projection = request.projection.as_deref();

        let mut partition: Vec<&Item> = items
            .range((request.partition.clone(), String::new())..)
            .take_while(|((name, _), _)| *name == request.partition)
            .map(|(_, item)| item)
            .collect();
        if request.descending {
            partition.reverse();
        }

        let limit = request.limit.map_or(usize::MAX, |l| l as usize);
        Ok(partition
            .into_iter()
            .take(limit)
            .map(|item| project(item, projection))
            .collect())
    }

    async fn put_if_absent(&self, item: Item) -> TableResult<()> {
        let key = key_of(&item)?;
        let mut items = self.items.write().await;
        if items.contains_key(&key) {
            return Err(TableError::ConditionFailed);
        }
        items.insert(key, item);
        Ok(())
    }

    async fn scan(&self, projection: &[&'static str]) -> TableResult<Vec<Item>> {
        let items = self.items.read().await;
        Ok(items
            .values()
            .map(|item| project(item, Some(projection)))
            .collect())
    }

    async fn delete(&self, partition: &str, sort: &str) -> TableResult<()> {
        let mut items = self.items.write().await;
        items.remove(&(partition.to_string(), sort.to_string()));
        Ok(())
    }
}
