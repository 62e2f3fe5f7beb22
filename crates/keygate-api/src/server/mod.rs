//! Server setup and initialization
//!
//! Explicit composition at process start: the directory, token service, and
//! password service are constructed here and passed into the state by value.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use keygate_common::{AppConfig, AppError, MemoryDirectory, TokenService};
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::apply_middleware;
use crate::routes::create_router;
use crate::state::AppState;

/// Build the complete Axum application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = state.config().cors.clone();
    let is_production = state.config().app.env.is_production();

    let router = create_router();
    let router = apply_middleware(router, &cors, is_production);
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub fn create_app_state(config: AppConfig) -> AppState {
    // The signing key is loaded exactly once; the token service holds the
    // derived keys read-only for the life of the process
    let token_service = TokenService::new(&config.auth.secret, config.auth.token_ttl_secs);

    let directory = Arc::new(MemoryDirectory::new());

    AppState::new(directory, token_service, config)
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{addr}");

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .server
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid server address: {e}")))?;

    let state = create_app_state(config);
    let app = create_app(state);

    run_server(app, addr).await
}
