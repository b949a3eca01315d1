//! Table setup command.

use std::io::Write;

use credstash_core::TableConfig;
use credstash_repository::{DynamoDbTable, SetupOutcome};

/// Create the secret table if it does not exist.
pub async fn run<W: Write>(
    table: &DynamoDbTable,
    config: &TableConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    let outcome = table
        .create_table(config.read_capacity, config.write_capacity)
        .await?;
    writeln!(out, "{}", describe(table.table_name(), outcome))?;
    Ok(())
}

fn describe(table: &str, outcome: SetupOutcome) -> String {
    match outcome {
        SetupOutcome::Created => format!("Created table '{}'.", table),
        SetupOutcome::AlreadyExists => {
            format!("Table '{}' already exists; nothing to do.", table)
        }
    }
}
