//! # credstash-core
//!
//! Configuration and utilities shared by the credstash crates.
//!
//! - **Configuration**: Loading, validation, and persistence of the config file
//! - **Paths**: Resolution of `~/.credstash` locations
//! - **Environment**: Typed access to environment overrides

pub mod config;
pub mod env;
pub mod error;
pub mod paths;

// Re-exports for convenience
pub use config::{Config, LogLevel, LoggingConfig, TableConfig};
pub use error::ConfigError;
