//! Seeded account CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use linkup_core::error::AppError;
use linkup_entity::account::Account;
use linkup_service::account::{AccountDirectory, MemoryAccountDirectory};

/// Arguments for account commands
#[derive(Debug, Args)]
pub struct AccountsArgs {
    /// Accounts subcommand
    #[command(subcommand)]
    pub command: AccountsCommand,
}

/// Account subcommands
#[derive(Debug, Subcommand)]
pub enum AccountsCommand {
    /// List accounts in the configured seed file
    List,
}

/// Account display row for table output
#[derive(Debug, Serialize, Tabled)]
struct AccountRow {
    /// Identity
    id: String,
    /// Display name
    name: String,
    /// Username
    username: String,
    /// Follower count
    followers: usize,
    /// Following count
    following: usize,
    /// Blocked count
    blocked: usize,
}

impl From<&Account> for AccountRow {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            name: account.name.clone(),
            username: account.username.clone().unwrap_or_default(),
            followers: account.followers.len(),
            following: account.following.len(),
            blocked: account.blocked_users.len(),
        }
    }
}

/// Execute account commands
pub async fn execute(
    args: &AccountsArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path).await?;

    match &args.command {
        AccountsCommand::List => {
            let Some(seed) = config.accounts.seed_file.as_deref() else {
                output::print_warning("No accounts.seed_file configured");
                return Ok(());
            };

            let directory = MemoryAccountDirectory::load_seed(seed).await?;
            let accounts = directory.list().await?;
            let rows: Vec<AccountRow> = accounts.iter().map(AccountRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
