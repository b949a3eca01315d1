//! CLI command implementations.

pub mod config;
pub mod secrets;
pub mod setup;
