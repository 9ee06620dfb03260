//! Binary crate for the `explorer` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Serving normalized provider data over HTTP
//! - Interactive configuration

use clap::Parser;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod server;

const DEFAULT_LOG_FILTER: &str = "explorer=info,explorer_core=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional; real deployments set the variables directly.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cmd = cli::Cli::parse();
    cmd.run().await
}
