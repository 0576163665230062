//! Binary crate for the `skycast` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Applying the rendered UI updates to the terminal (and optionally an
//!   HTML page)

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod html;
mod screen;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
