//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Default DynamoDB table holding secret records.
pub const DEFAULT_TABLE_NAME: &str = "credential-store";

/// Main credstash configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backing table settings.
    #[serde(default)]
    pub table: TableConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backing table configuration.
///
/// Injected into the DynamoDB adapter at construction time; nothing reads a
/// table name from ambient state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Table name.
    #[serde(default = "default_table_name")]
    pub name: String,

    /// AWS region. Falls back to the SDK's provider chain when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Endpoint override, e.g. `http://localhost:8000` for DynamoDB Local.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint_url: Option<String>,

    /// Provisioned read capacity used by `setup`.
    #[serde(default = "default_capacity")]
    pub read_capacity: i64,

    /// Provisioned write capacity used by `setup`.
    #[serde(default = "default_capacity")]
    pub write_capacity: i64,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: default_table_name(),
            region: None,
            endpoint_url: None,
            read_capacity: default_capacity(),
            write_capacity: default_capacity(),
        }
    }
}

fn default_table_name() -> String {
    DEFAULT_TABLE_NAME.to_string()
}

fn default_capacity() -> i64 {
    1
}

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON-formatted log lines.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}
