//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with environment-based filtering.
//! Pretty output for development, JSON for production.

use tracing::Level;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::config::Environment;

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Log level filter used when `RUST_LOG` is not set
    pub level: Level,
    /// Enable JSON output format
    pub json: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            json: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    /// Pick a configuration appropriate for the runtime environment
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        if env.is_production() {
            Self {
                level: Level::INFO,
                json: true,
                file_line: false,
            }
        } else {
            Self {
                level: Level::DEBUG,
                json: false,
                file_line: true,
            }
        }
    }
}

/// Initialize the tracing subscriber with default configuration
///
/// Uses `RUST_LOG` for filtering if set.
///
/// # Panics
/// Panics if a subscriber is already installed.
pub fn init_tracing() {
    init_tracing_with_config(TracingConfig::default());
}

/// Initialize the tracing subscriber with custom configuration
///
/// # Panics
/// Panics if a subscriber is already installed.
pub fn init_tracing_with_config(config: TracingConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.to_string()));

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .json()
                    .with_file(config.file_line)
                    .with_line_number(config.file_line),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_file(config.file_line)
                    .with_line_number(config.file_line),
            )
            .init();
    }
}

/// Try to initialize tracing, tolerating an already-installed subscriber
pub fn try_init_tracing() -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(TracingConfig::default().level.to_string()));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_file(true).with_line_number(true))
        .try_init()
        .map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
