//! # keygate-common
//!
//! Shared utilities: configuration, error handling, the token service, the
//! principal directory, and telemetry.

pub mod auth;
pub mod config;
pub mod directory;
pub mod error;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use auth::{
    hash_password, verify_password, Claims, PasswordService, TokenService,
    DEFAULT_TOKEN_TTL_SECS, RESERVED_CLAIMS,
};
pub use config::{
    AppConfig, AppSettings, AuthConfig, ConfigError, CorsConfig, Environment, ServerConfig,
};
pub use directory::{MemoryDirectory, Principal, UserDirectory};
pub use error::{AppError, AppResult, ErrorResponse, TokenError};
pub use telemetry::{init_tracing, init_tracing_with_config, try_init_tracing, TracingConfig, TracingError};
