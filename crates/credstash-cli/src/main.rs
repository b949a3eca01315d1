//! credstash CLI entry point.

use clap::Parser;
use credstash_cli::{logging, run, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Resolve config before logging so the configured level applies
    let config = cli.resolve_config()?;
    logging::init(cli.verbose, &config.logging);

    run(cli, config).await
}
