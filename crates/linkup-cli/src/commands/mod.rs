//! CLI command definitions and dispatch.

pub mod accounts;
pub mod config;
pub mod serve;
pub mod token;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use linkup_core::config::AppConfig;
use linkup_core::error::AppError;

/// Linkup: presence and call signaling server
#[derive(Debug, Parser)]
#[command(name = "linkup", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the Linkup server
    Serve(serve::ServeArgs),
    /// Access token management
    Token(token::TokenArgs),
    /// Seeded account inspection
    Accounts(accounts::AccountsArgs),
    /// Configuration management
    Config(config::ConfigArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config).await,
            Commands::Token(args) => token::execute(args, &self.config, self.format).await,
            Commands::Accounts(args) => accounts::execute(args, &self.config, self.format).await,
            Commands::Config(args) => config::execute(args, &self.config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub async fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load_file(config_path)
}
