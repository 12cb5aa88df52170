//! Start the Linkup server.

use clap::Args;

use linkup_core::error::AppError;

/// Arguments for the serve command
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the server port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Override the server host
    #[arg(long)]
    pub host: Option<String>,

    /// Override the account seed file
    #[arg(long)]
    pub seed: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, config_path: &str) -> Result<(), AppError> {
    let mut config = super::load_config(config_path).await?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(ref host) = args.host {
        config.server.host = host.clone();
    }
    if let Some(ref seed) = args.seed {
        config.accounts.seed_file = Some(seed.clone());
    }

    println!("Starting Linkup server...");
    println!("  Host: {}", config.server.host);
    println!("  Port: {}", config.server.port);

    linkup_api::app::run_server(config).await
}
