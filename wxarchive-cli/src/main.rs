//! Binary crate for the `wxarchive` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Wiring logging and configuration at process start
//! - Invoking the fetch and transform steps

use anyhow::Context;
use clap::Parser;

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();

    tracing::subscriber::set_global_default(
        tracing_subscriber::FmtSubscriber::builder()
            .with_max_level(cmd.log_level)
            .finish(),
    )
    .context("failed to set tracing subscriber")?;

    cmd.run().await
}
