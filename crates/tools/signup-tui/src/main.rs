mod app;
mod cli;
mod config;
mod logging;
mod page;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use crate::cli::{Cli, Command, TokenCommand};
use crate::config::AppConfig;
use signup_client::LocalStorage;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(cli.base_url.clone())?;

    execute(cli.command(), &config).await
}

/// Only the page writes a log file; token commands talk to stdout.
async fn execute(command: Command, config: &AppConfig) -> Result<()> {
    match command {
        Command::Run => {
            logging::init(&config.logging, &config.log_filter())?;
            app::run(config).await
        }
        Command::Token { action } => {
            let storage = config.local_storage()?;
            run_token_command(&storage, &config.storage.token_key, action)
        }
    }
}

fn run_token_command(storage: &LocalStorage, key: &str, action: TokenCommand) -> Result<()> {
    match action {
        TokenCommand::Show => {
            let token = storage
                .get_item(key)
                .with_context(|| format!("Failed to read {}", storage.path().display()))?;
            match token.filter(|t| !t.is_empty()) {
                Some(token) => println!("{token}"),
                None => println!("No token stored"),
            }
        }
        TokenCommand::Set { token } => {
            let token = token.trim();
            if token.is_empty() {
                anyhow::bail!("Token cannot be empty");
            }
            storage
                .set_item(key, token)
                .with_context(|| format!("Failed to write {}", storage.path().display()))?;
            info!(key, "Bearer token stored");
            println!("Token stored in {}", storage.path().display());
        }
        TokenCommand::Clear => {
            let previous = storage
                .remove_item(key)
                .with_context(|| format!("Failed to write {}", storage.path().display()))?;
            info!(key, removed = previous.is_some(), "Bearer token cleared");
            println!("Token cleared");
        }
    }
    Ok(())
}
