//! Error types

pub mod app_error;
pub mod token_error;

pub use app_error::{AppError, AppResult, ErrorResponse};
pub use token_error::TokenError;
