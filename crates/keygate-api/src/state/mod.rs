//! Application state
//!
//! Holds the shared state for the Axum application. All dependencies are
//! composed explicitly at startup and passed in by reference; there is no
//! runtime container.

use std::sync::Arc;

use keygate_common::{AppConfig, PasswordService, TokenService, UserDirectory};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    directory: Arc<dyn UserDirectory>,
    token_service: Arc<TokenService>,
    password_service: PasswordService,
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(
        directory: Arc<dyn UserDirectory>,
        token_service: TokenService,
        config: AppConfig,
    ) -> Self {
        Self {
            directory,
            token_service: Arc::new(token_service),
            password_service: PasswordService::new(),
            config: Arc::new(config),
        }
    }

    /// Get the principal directory
    pub fn directory(&self) -> &dyn UserDirectory {
        self.directory.as_ref()
    }

    /// Get the token service
    pub fn token_service(&self) -> &TokenService {
        &self.token_service
    }

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("token_service", &self.token_service)
            .field("config", &"AppConfig")
            .finish()
    }
}
