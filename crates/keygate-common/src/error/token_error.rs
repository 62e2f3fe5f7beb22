//! Token validation error taxonomy
//!
//! Every variant is recoverable at the request boundary: the gate translates
//! any of them into a generic "authentication required" response.

/// Errors produced while issuing or validating a token
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The three-segment structure could not be parsed
    #[error("malformed token")]
    Malformed,

    /// The signature does not match the signing key
    #[error("invalid token signature")]
    InvalidSignature,

    /// Parsed and authentic, but past its expiry instant
    #[error("token expired")]
    Expired,

    /// A required claim was absent during extraction
    #[error("missing claim: {0}")]
    MissingClaim(String),

    /// The token subject does not match the expected principal
    #[error("token subject mismatch")]
    SubjectMismatch,

    /// An extra claim collided with a reserved claim name at issuance
    #[error("reserved claim name: {0}")]
    ReservedClaim(String),

    /// Issuance was requested for an empty subject
    #[error("token subject must not be empty")]
    EmptySubject,

    /// Token serialization failed
    #[error("token encoding failed")]
    Encoding,
}
