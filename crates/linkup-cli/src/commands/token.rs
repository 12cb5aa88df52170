//! Access token CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use linkup_auth::jwt::JwtEncoder;
use linkup_core::error::AppError;
use linkup_core::types::Identity;

/// Arguments for token commands
#[derive(Debug, Args)]
pub struct TokenArgs {
    /// Token subcommand
    #[command(subcommand)]
    pub command: TokenCommand,
}

/// Token subcommands
#[derive(Debug, Subcommand)]
pub enum TokenCommand {
    /// Mint an access token for an identity
    Issue {
        /// Account identity (JWT subject)
        #[arg(short, long)]
        identity: String,
        /// Optional username claim
        #[arg(short, long)]
        username: Option<String>,
        /// Lifetime in minutes, defaults to `auth.jwt_access_ttl_minutes`
        #[arg(long)]
        ttl_minutes: Option<i64>,
    },
}

/// Execute token commands
pub async fn execute(
    args: &TokenArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path).await?;
    let encoder = JwtEncoder::new(&config.auth);

    match &args.command {
        TokenCommand::Issue {
            identity,
            username,
            ttl_minutes,
        } => {
            let identity = Identity::parse(identity)?;
            let issued = match ttl_minutes {
                Some(minutes) => encoder.issue_with_ttl(
                    &identity,
                    username.as_deref(),
                    chrono::Duration::minutes(*minutes),
                )?,
                None => encoder.issue(&identity, username.as_deref())?,
            };

            match format {
                OutputFormat::Json => output::print_item(&issued, format),
                OutputFormat::Table => {
                    output::print_kv("Identity", identity.as_str());
                    output::print_kv("Expires at", &issued.expires_at.to_rfc3339());
                    println!("{}", issued.token);
                }
            }
        }
    }

    Ok(())
}
