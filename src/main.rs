//! promptdrop - file + prompt relay for a hosted multimodal model
//!
//! Main entry point for the promptdrop binary.

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use promptdrop::cli::{Cli, Commands};
use promptdrop::commands;
use promptdrop::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize tracing
    init_tracing(cli.verbose);

    // Load and validate configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!("Starting relay endpoint");
            commands::serve::run_serve(config).await?;
            Ok(())
        }
        Commands::Send { files, prompt, .. } => {
            tracing::info!("Submitting {} staged file(s)", files.len());
            commands::send::run_send(config, files, prompt).await?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "promptdrop=debug"
    } else {
        "promptdrop=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
