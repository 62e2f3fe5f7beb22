//! Application configuration structs
//!
//! Loads configuration from environment variables.

use serde::Deserialize;
use std::env;

use crate::auth::DEFAULT_TOKEN_TTL_SECS;

/// Minimum accepted signing-secret length in bytes (256 bits)
pub const MIN_SECRET_BYTES: usize = 32;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication configuration
///
/// The signing secret is process-wide configuration supplied via the
/// environment, never a source literal.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub secret: String,
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: i64,
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "keygate".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_token_ttl() -> i64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if a required variable is missing or the signing
    /// secret is shorter than [`MIN_SECRET_BYTES`]
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let secret = env::var("AUTH_SECRET").map_err(|_| ConfigError::MissingVar("AUTH_SECRET"))?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::InvalidValue(
                "AUTH_SECRET",
                format!("must be at least {MIN_SECRET_BYTES} bytes"),
            ));
        }

        Ok(Self {
            app: AppSettings {
                name: env::var("APP_NAME").unwrap_or_else(|_| default_app_name()),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| match s.to_lowercase().as_str() {
                        "production" => Some(Environment::Production),
                        "staging" => Some(Environment::Staging),
                        "development" => Some(Environment::Development),
                        _ => None,
                    })
                    .unwrap_or_default(),
            },
            server: ServerConfig {
                host: env::var("API_HOST").unwrap_or_else(|_| default_host()),
                port: parse_required("API_PORT")?,
            },
            auth: AuthConfig {
                secret,
                token_ttl_secs: parse_optional("AUTH_TOKEN_TTL_SECS", default_token_ttl())?,
            },
            cors: CorsConfig {
                allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .ok()
                    .map(|s| s.split(',').map(str::trim).map(String::from).collect())
                    .unwrap_or_default(),
            },
        })
    }
}

/// Read a required numeric variable; absent and unparseable are distinct errors
fn parse_required<T: std::str::FromStr>(name: &'static str) -> Result<T, ConfigError> {
    let raw = env::var(name).map_err(|_| ConfigError::MissingVar(name))?;
    raw.trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name, raw))
}

/// Read an optional numeric variable; set-but-unparseable is an error, not a default
fn parse_optional<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
