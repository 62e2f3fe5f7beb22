//! Keygate API server entry point
//!
//! Run with:
//! ```bash
//! cargo run -p keygate-api
//! ```
//!
//! Configuration is loaded from environment variables; `AUTH_SECRET` and
//! `API_PORT` are required.

use keygate_common::{try_init_tracing, AppConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // Initialize tracing
    if let Err(e) = try_init_tracing() {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    // Run the server
    if let Err(e) = run().await {
        error!(error = %e, "Server failed to start");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting keygate API server...");

    // Key-load failure is the only condition that aborts initialization
    let config = AppConfig::from_env().map_err(|e| {
        error!(error = %e, "Failed to load configuration");
        e
    })?;

    info!(
        env = ?config.app.env,
        port = config.server.port,
        token_ttl_secs = config.auth.token_ttl_secs,
        "Configuration loaded"
    );

    keygate_api::run(config).await?;

    Ok(())
}
