//! Tracing subscriber setup.

use credstash_core::{LogLevel, LoggingConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter directive for the credstash crates at the given verbosity.
///
/// Each `-v` raises the configured level by one step.
pub fn directive(verbose: u8, config: &LoggingConfig) -> String {
    let levels = [
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];
    let base = levels
        .iter()
        .position(|l| *l == config.level)
        .unwrap_or(2);
    let index = (base + verbose as usize).min(levels.len() - 1);
    format!("credstash={}", levels[index].as_str())
}

/// Install the global subscriber. `RUST_LOG` takes precedence when set.
///
/// Logs go to stderr so command output on stdout stays scriptable.
pub fn init(verbose: u8, config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| directive(verbose, config).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
