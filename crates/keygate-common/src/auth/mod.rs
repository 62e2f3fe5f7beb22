//! Authentication utilities

mod password;
mod token;

pub use password::{hash_password, verify_password, PasswordService};
pub use token::{Claims, TokenService, DEFAULT_TOKEN_TTL_SECS, RESERVED_CLAIMS};
