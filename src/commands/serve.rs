//! Serve command handler
//!
//! Builds the provider from configuration and runs the relay endpoint until
//! the process is stopped.

use crate::config::Config;
use crate::error::Result;
use crate::providers::create_provider;
use crate::server::{router, AppState};

/// Runs the relay endpoint with the given configuration
///
/// # Errors
///
/// Returns error if the provider cannot be constructed, the bind address is
/// unavailable, or the server fails while running.
pub async fn run_serve(config: Config) -> Result<()> {
    let provider = create_provider(&config.provider)?;
    tracing::info!(
        "relaying uploads to provider {} (model {})",
        provider.name(),
        config.provider.hosted.model
    );

    let app = router(AppState { provider });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("relay listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
