//! Configuration management CLI commands.

use clap::{Args, Subcommand};

use crate::output::{self, OutputFormat};
use linkup_core::config::AppConfig;
use linkup_core::error::AppError;

/// Arguments for config commands
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration with secrets masked
    Show,
}

/// Execute config commands
pub async fn execute(
    args: &ConfigArgs,
    config_path: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    match &args.command {
        ConfigCommand::Show => {
            let config = super::load_config(config_path).await?;
            output::print_item(&masked(config), format);
        }
    }

    Ok(())
}

/// Replaces the signing secret before display.
fn masked(mut config: AppConfig) -> AppConfig {
    config.auth.jwt_secret = "****".to_string();
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_is_masked() {
        let mut config = AppConfig::default();
        config.auth.jwt_secret = "super-secret".to_string();
        let shown = masked(config);
        assert_eq!(shown.auth.jwt_secret, "****");
        assert_eq!(shown.server.port, 5000);
    }
}
