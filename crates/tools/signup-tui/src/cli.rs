use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Terminal signup page for the signup API
#[derive(Parser, Debug)]
#[command(name = "signup-tui")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file (TOML)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Origin of the API server, e.g. http://localhost:8080
    #[arg(short, long, value_name = "URL", global = true)]
    pub base_url: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Open the signup page (default)
    Run,
    /// Manage the stored bearer token
    Token {
        #[command(subcommand)]
        action: TokenCommand,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum TokenCommand {
    /// Print the stored token
    Show,
    /// Store a token to send with every request
    Set {
        /// Token value, without the "Bearer " prefix
        token: String,
    },
    /// Remove the stored token
    Clear,
}

impl Cli {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Run)
    }
}
