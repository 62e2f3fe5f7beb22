//! Password hashing and verification
//!
//! Uses Argon2id via the `argon2` crate. Hashing policy beyond the default
//! parameters is out of scope here.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::AppError;

/// Hash a password using Argon2id
///
/// # Errors
/// Returns an error if hashing fails
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Verify a password against a hash
///
/// # Errors
/// Returns an error if the stored hash cannot be parsed
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Password service for explicit composition at startup
#[derive(Debug, Clone, Default)]
pub struct PasswordService;

impl PasswordService {
    /// Create a new password service
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Hash a password
    ///
    /// # Errors
    /// Returns an error if hashing fails
    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        hash_password(password)
    }

    /// Verify a password and return an error if it does not match
    ///
    /// # Errors
    /// Returns `AppError::InvalidCredentials` if the password doesn't match
    pub fn verify_or_error(&self, password: &str, hash: &str) -> Result<(), AppError> {
        if verify_password(password, hash)? {
            Ok(())
        } else {
            Err(AppError::InvalidCredentials)
        }
    }
}
