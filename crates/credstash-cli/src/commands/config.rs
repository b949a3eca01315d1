//! Configuration management commands.

use std::io::Write;
use std::path::Path;

use clap::Args;
use credstash_core::config::Config;
use credstash_core::paths;

/// Config command arguments.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Get a configuration value
    Get {
        /// Configuration key (dot-separated path)
        key: String,
    },

    /// Write the effective configuration to the config file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

/// Look up a dot-separated key in the serialized configuration.
fn lookup(config: &Config, key: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let json = serde_json::to_value(config)?;
    let value = key
        .split('.')
        .try_fold(&json, |acc, k| acc.get(k))
        .cloned();
    Ok(value)
}

/// Run the config command against the effective configuration.
pub fn run<W: Write>(
    args: ConfigArgs,
    config: &Config,
    explicit_path: Option<&Path>,
    out: &mut W,
) -> anyhow::Result<()> {
    let path = match explicit_path {
        Some(path) => path.to_path_buf(),
        None => paths::config_file()?,
    };

    match args.command {
        ConfigCommand::Show => {
            writeln!(out, "{}", config.to_json5()?)?;
        }

        ConfigCommand::Get { key } => match lookup(config, &key)? {
            Some(v) => writeln!(out, "{}", serde_json::to_string_pretty(&v)?)?,
            None => anyhow::bail!("Key not found: {}", key),
        },

        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }
            config.save(&path)?;
            writeln!(out, "Created config file: {}", path.display())?;
        }

        ConfigCommand::Path => {
            writeln!(out, "{}", path.display())?;
        }
    }

    Ok(())
}
