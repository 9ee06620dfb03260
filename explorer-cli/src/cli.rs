use anyhow::Context;
use clap::{Parser, Subcommand};
use explorer_core::{Config, Dispatcher, ProviderId};
use inquire::{Password, PasswordDisplayMode};

use crate::server;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "explorer", version, about = "City explorer API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the explorer API over HTTP.
    Serve {
        /// Interface to bind; overrides HOST and the config file.
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on; overrides PORT and the config file.
        #[arg(long)]
        port: Option<u16>,
    },

    /// Configure credentials for a specific provider.
    Configure {
        /// Provider short name, e.g. "geocode" or "yelp".
        provider: String,
    },

    /// Resolve a place name and print the normalized location.
    Locate {
        /// Address or location name.
        query: String,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Serve { host, port } => {
                let mut config = Config::from_env()?;
                if let Some(host) = host {
                    config.server.host = host;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }
                server::serve(config).await
            }
            Command::Configure { provider } => configure(&provider),
            Command::Locate { query } => {
                let dispatcher = Dispatcher::from_config(Config::from_env()?)?;
                let location = dispatcher
                    .location(&query)
                    .await
                    .with_context(|| format!("Could not resolve '{query}'"))?;

                println!("{}", serde_json::to_string_pretty(&location)?);
                Ok(())
            }
        }
    }
}

fn configure(provider: &str) -> anyhow::Result<()> {
    let id = ProviderId::try_from(provider)?;
    let mut config = Config::load()?;

    let api_key = Password::new(&format!("API key for {id}:"))
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("Failed to read API key")?;

    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key for '{id}' must not be empty");
    }

    config.upsert_provider_api_key(id, api_key.to_string());
    config.save()?;

    println!(
        "Saved {id} credentials to {}",
        Config::config_file_path()?.display()
    );
    Ok(())
}
