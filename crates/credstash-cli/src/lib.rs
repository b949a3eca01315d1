//! credstash command-line interface.

pub mod commands;
pub mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use credstash_core::env::vars;
use credstash_core::{Config, ConfigError};
use credstash_repository::{DynamoDbTable, TableRepository};

/// credstash - versioned secrets in DynamoDB
#[derive(Parser)]
#[command(name = "credstash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = vars::CREDSTASH_CONFIG, global = true)]
    pub config: Option<PathBuf>,

    /// DynamoDB table name
    #[arg(short, long, global = true)]
    pub table: Option<String>,

    /// AWS region
    #[arg(short, long, global = true)]
    pub region: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Create the secret table if it does not exist
    Setup,

    /// List every secret and version (no secret material is read)
    List,

    /// Show the versions of one secret
    Versions {
        /// Secret name
        name: String,

        /// Show only the newest N versions
        #[arg(short = 'n', long, value_parser = clap::value_parser!(u32).range(1..))]
        limit: Option<u32>,
    },

    /// Print the latest version token of a secret
    Latest {
        /// Secret name
        name: String,
    },

    /// Delete one version, or every version, of a secret
    Delete {
        /// Secret name
        name: String,

        /// Delete only this version
        #[arg(long)]
        version: Option<String>,
    },

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Resolve the effective configuration: file, then environment, then flags.
    pub fn resolve_config(&self) -> Result<Config, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load(path)?;
                config.apply_env_overrides();
                config
            }
            None => Config::load_or_default()?,
        };

        if let Some(table) = &self.table {
            config.table.name = table.clone();
        }
        if let Some(region) = &self.region {
            config.table.region = Some(region.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

/// Build a repository over the configured DynamoDB table.
async fn repository(config: &Config) -> TableRepository<DynamoDbTable> {
    TableRepository::new(DynamoDbTable::from_config(&config.table).await)
}

/// Run the CLI with the given arguments and resolved configuration.
pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    let mut out = std::io::stdout();

    match cli.command {
        Commands::Setup => {
            let table = DynamoDbTable::from_config(&config.table).await;
            commands::setup::run(&table, &config.table, &mut out).await
        }
        Commands::List => commands::secrets::list(&repository(&config).await, &mut out).await,
        Commands::Versions { name, limit } => {
            commands::secrets::versions(&repository(&config).await, &name, limit, &mut out).await
        }
        Commands::Latest { name } => {
            commands::secrets::latest(&repository(&config).await, &name, &mut out).await
        }
        Commands::Delete { name, version } => {
            let repo = repository(&config).await;
            commands::secrets::delete(&repo, &name, version.as_deref(), &mut out).await
        }
        Commands::Config(args) => {
            commands::config::run(args, &config, cli.config.as_deref(), &mut out)
        }
        Commands::Version => {
            println!("credstash {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
