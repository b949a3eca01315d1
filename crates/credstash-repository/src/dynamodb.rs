//! DynamoDB backing table.
//!
//! Implements [`KeyValueTable`] with `aws-sdk-dynamodb`. `name` is a DynamoDB
//! reserved word, so every expression goes through `#`-prefixed attribute
//! name placeholders.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::types::{
    AttributeDefinition, AttributeValue, KeySchemaElement, KeyType, ProvisionedThroughput,
    ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::Client;
use credstash_core::TableConfig;
use tracing::{debug, info};

use crate::error::TableError;
use crate::table::{Item, KeyValueTable, QueryRequest, TableResult};
use crate::types::{ATTR_NAME, ATTR_VERSION};

/// Raw DynamoDB item.
type Attributes = HashMap<String, AttributeValue>;

/// How often `create_table` polls for the table to become active.
const ACTIVE_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polls before `create_table` gives up waiting.
const ACTIVE_POLL_ATTEMPTS: u32 = 60;

/// Result of [`DynamoDbTable::create_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupOutcome {
    /// The table was created and is active.
    Created,
    /// A table with this name already existed; nothing changed.
    AlreadyExists,
}

/// A DynamoDB table keyed by `name` (hash) and `version` (range).
#[derive(Debug, Clone)]
pub struct DynamoDbTable {
    client: Client,
    table_name: String,
}

impl DynamoDbTable {
    /// Wrap an existing client.
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    /// Build a client from the AWS provider chain, applying the configured
    /// region and endpoint overrides.
    pub async fn from_config(config: &TableConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        if let Some(endpoint) = &config.endpoint_url {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;
        Self::new(Client::new(&sdk_config), config.name.clone())
    }

    /// Name of the backing table.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// Whether the table exists.
    pub async fn table_exists(&self) -> TableResult<bool> {
        match self
            .client
            .describe_table()
            .table_name(&self.table_name)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_not_found_exception()) =>
            {
                Ok(false)
            }
            Err(err) => Err(TableError::backend(err)),
        }
    }

    /// Create the table with provisioned capacity and wait until it is active.
    pub async fn create_table(
        &self,
        read_capacity: i64,
        write_capacity: i64,
    ) -> TableResult<SetupOutcome> {
        if self.table_exists().await? {
            info!(table = %self.table_name, "table already exists");
            return Ok(SetupOutcome::AlreadyExists);
        }

        let key_schema = vec![
            KeySchemaElement::builder()
                .attribute_name(ATTR_NAME)
                .key_type(KeyType::Hash)
                .build()
                .map_err(TableError::backend)?,
            KeySchemaElement::builder()
                .attribute_name(ATTR_VERSION)
                .key_type(KeyType::Range)
                .build()
                .map_err(TableError::backend)?,
        ];
        let attribute_definitions = vec![
            AttributeDefinition::builder()
                .attribute_name(ATTR_NAME)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(TableError::backend)?,
            AttributeDefinition::builder()
                .attribute_name(ATTR_VERSION)
                .attribute_type(ScalarAttributeType::S)
                .build()
                .map_err(TableError::backend)?,
        ];
        let throughput = ProvisionedThroughput::builder()
            .read_capacity_units(read_capacity)
            .write_capacity_units(write_capacity)
            .build()
            .map_err(TableError::backend)?;

        info!(table = %self.table_name, read_capacity, write_capacity, "creating table");
        match self
            .client
            .create_table()
            .table_name(&self.table_name)
            .set_key_schema(Some(key_schema))
            .set_attribute_definitions(Some(attribute_definitions))
            .provisioned_throughput(throughput)
            .send()
            .await
        {
            Ok(_) => {}
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_in_use_exception()) =>
            {
                return Ok(SetupOutcome::AlreadyExists);
            }
            Err(err) => return Err(TableError::backend(err)),
        }

        self.wait_until_active().await?;
        info!(table = %self.table_name, "table is active");
        Ok(SetupOutcome::Created)
    }

    async fn wait_until_active(&self) -> TableResult<()> {
        for _ in 0..ACTIVE_POLL_ATTEMPTS {
            let output = self
                .client
                .describe_table()
                .table_name(&self.table_name)
                .send()
                .await
                .map_err(TableError::backend)?;

            if output.table().and_then(|t| t.table_status()) == Some(&TableStatus::Active) {
                return Ok(());
            }
            tokio::time::sleep(ACTIVE_POLL_INTERVAL).await;
        }

        Err(TableError::Backend(
            format!(
                "table {} did not become active after {} attempts",
                self.table_name, ACTIVE_POLL_ATTEMPTS
            )
            .into(),
        ))
    }
}

/// Placeholder used for `attr` in expressions.
fn placeholder(attr: &str) -> String {
    format!("#{attr}")
}

/// Projection expression and the placeholder names it references.
fn projection_expression(attrs: &[&'static str]) -> (String, Vec<(String, &'static str)>) {
    let names: Vec<(String, &'static str)> =
        attrs.iter().map(|attr| (placeholder(attr), *attr)).collect();
    let expression = names
        .iter()
        .map(|(p, _)| p.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    (expression, names)
}

fn to_attributes(item: Item) -> Attributes {
    item.into_iter()
        .map(|(attr, value)| (attr, AttributeValue::S(value)))
        .collect()
}

fn from_attributes(raw: &Attributes) -> TableResult<Item> {
    raw.iter()
        .map(|(attr, value)| match value {
            AttributeValue::S(s) => Ok((attr.clone(), s.clone())),
            _ => Err(TableError::Malformed(format!(
                "attribute '{attr}' is not a string"
            ))),
        })
        .collect()
}

#[async_trait]
impl KeyValueTable for DynamoDbTable {
    async fn query(&self, request: QueryRequest) -> TableResult<Vec<Item>> {
        if request.limit == Some(0) {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        let mut start_key: Option<Attributes> = None;

        loop {
            let mut builder = self
                .client
                .query()
                .table_name(&self.table_name)
                .consistent_read(request.consistent)
                .key_condition_expression(format!("{} = :name", placeholder(ATTR_NAME)))
                .expression_attribute_names(placeholder(ATTR_NAME), ATTR_NAME)
                .expression_attribute_values(
                    ":name",
                    AttributeValue::S(request.partition.clone()),
                )
                .scan_index_forward(!request.descending)
                .set_exclusive_start_key(start_key.take());

            if let Some(attrs) = &request.projection {
                let (expression, names) = projection_expression(attrs);
                builder = builder.projection_expression(expression);
                for (p, attr) in names {
                    builder = builder.expression_attribute_names(p, attr);
                }
            }
            if let Some(limit) = request.limit {
                let remaining = (limit as usize).saturating_sub(items.len());
                builder = builder.limit(i32::try_from(remaining).unwrap_or(i32::MAX));
            }

            let output = builder.send().await.map_err(TableError::backend)?;
            for raw in output.items() {
                items.push(from_attributes(raw)?);
            }

            start_key = output.last_evaluated_key().cloned();
            let satisfied = request
                .limit
                .is_some_and(|limit| items.len() >= limit as usize);
            if start_key.is_none() || satisfied {
                break;
            }
        }

        debug!(table = %self.table_name, count = items.len(), "query complete");
        Ok(items)
    }

    async fn put_if_absent(&self, item: Item) -> TableResult<()> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(to_attributes(item)))
            .condition_expression(format!("attribute_not_exists({})", placeholder(ATTR_NAME)))
            .expression_attribute_names(placeholder(ATTR_NAME), ATTR_NAME)
            .send()
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_conditional_check_failed_exception()) =>
            {
                Err(TableError::ConditionFailed)
            }
            Err(err) => Err(TableError::backend(err)),
        }
    }

    async fn scan(&self, projection: &[&'static str]) -> TableResult<Vec<Item>> {
        let (expression, names) = projection_expression(projection);
        let mut items = Vec::new();
        let mut start_key: Option<Attributes> = None;

        loop {
            let mut builder = self
                .client
                .scan()
                .table_name(&self.table_name)
                .projection_expression(expression.clone())
                .set_exclusive_start_key(start_key.take());
            for (p, attr) in &names {
                builder = builder.expression_attribute_names(p.clone(), *attr);
            }

            let output = builder.send().await.map_err(TableError::backend)?;
            for raw in output.items() {
                items.push(from_attributes(raw)?);
            }

            start_key = output.last_evaluated_key().cloned();
            if start_key.is_none() {
                break;
            }
        }

        debug!(table = %self.table_name, count = items.len(), "scan complete");
        Ok(items)
    }

    async fn delete(&self, partition: &str, sort: &str) -> TableResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(ATTR_NAME, AttributeValue::S(partition.to_string()))
            .key(ATTR_VERSION, AttributeValue::S(sort.to_string()))
            .send()
            .await
            .map_err(TableError::backend)?;
        Ok(())
    }
}
