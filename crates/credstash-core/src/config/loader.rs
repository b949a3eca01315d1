//! Configuration loading and persistence.

use super::{Config, LogLevel};
use crate::env;
use crate::error::ConfigError;
use crate::paths;
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.table.name.trim().is_empty() {
            errors.push("Table name must not be empty".to_string());
        }

        if self.table.read_capacity <= 0 {
            errors.push(format!(
                "Table read_capacity must be greater than 0, got {}",
                self.table.read_capacity
            ));
        }
        if self.table.write_capacity <= 0 {
            errors.push(format!(
                "Table write_capacity must be greater than 0, got {}",
                self.table.write_capacity
            ));
        }

        if let Some(region) = &self.table.region {
            if region.trim().is_empty() {
                errors.push("Table region must not be empty when set".to_string());
            }
        }

        if let Some(endpoint) = &self.table.endpoint_url {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                errors.push(format!(
                    "Invalid endpoint_url '{}', expected an http:// or https:// URL",
                    endpoint
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Load configuration from the default path, falling back to defaults if no file exists.
    ///
    /// Environment overrides are applied in both cases.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        let mut config = match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::default(),
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply `CREDSTASH_TABLE`, `AWS_REGION`, `CREDSTASH_ENDPOINT_URL` and
    /// `CREDSTASH_LOG_JSON`.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(env::get_var);
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(table) = lookup(env::vars::CREDSTASH_TABLE) {
            self.table.name = table;
        }
        if let Some(region) = lookup(env::vars::AWS_REGION) {
            self.table.region = Some(region);
        }
        if let Some(endpoint) = lookup(env::vars::CREDSTASH_ENDPOINT_URL) {
            self.table.endpoint_url = Some(endpoint);
        }
        if let Some(json) = lookup(env::vars::CREDSTASH_LOG_JSON) {
            self.logging.json = env::parse_bool(&json);
        }
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.config.table.name = name.into();
        self
    }

    /// Set the AWS region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.config.table.region = Some(region.into());
        self
    }

    /// Set the endpoint override.
    pub fn endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.config.table.endpoint_url = Some(url.into());
        self
    }

    /// Set provisioned capacity for table setup.
    pub fn capacity(mut self, read: i64, write: i64) -> Self {
        self.config.table.read_capacity = read;
        self.config.table.write_capacity = write;
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Config {
        self.config
    }
}
