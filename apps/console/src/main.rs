//! # Deli Console Entry Point
//!
//! ## Startup Sequence
//! 1. Parse the command line
//! 2. Initialize tracing (logging to stderr)
//! 3. Load configuration (file, then `DELI_*` environment overrides)
//! 4. Build the API client
//! 5. Run the command

use anyhow::Context;
use clap::Parser;
use tracing::info;

use deli_api::ConsoleConfig;
use deli_console::cli::{self, Cli};
use deli_console::Console;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    deli_console::init_tracing();
    info!("Starting deli console");

    let config = ConsoleConfig::load(cli.config.clone()).context("could not load configuration")?;
    let console = Console::new(config).context("could not create the API client")?;

    cli::run(cli, &console).await
}
