//! Configuration

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, AuthConfig, ConfigError, CorsConfig, Environment, ServerConfig,
    MIN_SECRET_BYTES,
};
