//! catalogsync CLI: import a product catalog into a content store.
//!
//! Running with no arguments performs a full import using the config file,
//! environment overrides, and built-in defaults.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli).await
}
