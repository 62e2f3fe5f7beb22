//! Token issuance and validation
//!
//! Self-contained signed credentials (JWT, HS256) via the `jsonwebtoken`
//! crate. A token carries a subject, issued-at and expiry timestamps plus
//! optional extra claims, and is verifiable with nothing but the signing
//! secret.

use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TokenError;

/// Default token lifetime in seconds (24 hours).
pub const DEFAULT_TOKEN_TTL_SECS: i64 = 86_400;

/// Claim names managed by the service itself; extra claims must not use them.
pub const RESERVED_CLAIMS: [&str; 3] = ["sub", "iat", "exp"];

/// Claims carried by an issued token
///
/// Timestamps are seconds since the Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (principal username)
    pub sub: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    /// Caller-supplied extra claims
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Claims {
    /// Check if the token is past its expiry instant
    #[must_use]
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() > self.exp
    }
}

/// Token service for issuing and validating signed credentials
///
/// The keys are derived once from the shared secret and never mutated, so a
/// single instance is safely shared across request-handling tasks.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a new token service with the given secret and token lifetime
    #[must_use]
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Issue a token for a principal with no extra claims
    ///
    /// # Errors
    /// Returns an error if the subject is empty or encoding fails
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        self.issue_with_claims(subject, Map::new())
    }

    /// Issue a token for a principal with caller-supplied extra claims
    ///
    /// # Errors
    /// Returns an error if the subject is empty, an extra claim collides
    /// with a reserved claim name, or encoding fails
    pub fn issue_with_claims(
        &self,
        subject: &str,
        extra: Map<String, Value>,
    ) -> Result<String, TokenError> {
        if subject.is_empty() {
            return Err(TokenError::EmptySubject);
        }
        if let Some(key) = extra.keys().find(|k| RESERVED_CLAIMS.contains(&k.as_str())) {
            return Err(TokenError::ReservedClaim(key.clone()));
        }

        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_owned(),
            iat: now,
            exp: now + self.ttl_secs,
            extra,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|_| TokenError::Encoding)
    }

    /// Extract the subject from a token
    ///
    /// Verifies the signature but not expiry: reading claims out of an
    /// expired token still succeeds.
    ///
    /// # Errors
    /// Returns an error if the token is malformed, the signature does not
    /// match, or the `sub` claim is absent
    pub fn extract_subject(&self, token: &str) -> Result<String, TokenError> {
        match self.extract_claim(token, "sub")? {
            Value::String(sub) => Ok(sub),
            _ => Err(TokenError::Malformed),
        }
    }

    /// Extract a single claim from a token by name
    ///
    /// Same signature-only verification as [`Self::extract_subject`].
    ///
    /// # Errors
    /// Returns an error if the token is malformed, the signature does not
    /// match, or the claim is absent
    pub fn extract_claim(&self, token: &str, key: &str) -> Result<Value, TokenError> {
        let mut raw = self.decode_raw(token)?;
        raw.remove(key).ok_or_else(|| TokenError::MissingClaim(key.to_owned()))
    }

    /// Extract the full claims set from a token
    ///
    /// # Errors
    /// Returns an error if the token is malformed, the signature does not
    /// match, or a required claim is absent
    pub fn extract_claims(&self, token: &str) -> Result<Claims, TokenError> {
        let mut raw = self.decode_raw(token)?;

        let sub = match raw.remove("sub") {
            Some(Value::String(sub)) => sub,
            Some(_) => return Err(TokenError::Malformed),
            None => return Err(TokenError::MissingClaim("sub".to_owned())),
        };
        let iat = Self::numeric_claim(&mut raw, "iat")?;
        let exp = Self::numeric_claim(&mut raw, "exp")?;

        Ok(Claims { sub, iat, exp, extra: raw })
    }

    /// Fully validate a token against an expected subject
    ///
    /// Checks signature, exact subject match, and expiry. Whether the
    /// principal still exists is the caller's concern.
    ///
    /// # Errors
    /// Returns an error describing the first check that failed
    pub fn validate(&self, token: &str, expected_subject: &str) -> Result<Claims, TokenError> {
        let claims = self.extract_claims(token)?;

        if claims.sub != expected_subject {
            return Err(TokenError::SubjectMismatch);
        }
        if claims.is_expired() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Check whether a token is valid for an expected subject
    ///
    /// Any failure (malformed, bad signature, wrong subject, expired) yields
    /// `false`; this call never panics or propagates an error.
    #[must_use]
    pub fn is_valid(&self, token: &str, expected_subject: &str) -> bool {
        self.validate(token, expected_subject).is_ok()
    }

    /// Signature-verify a token and return its raw claims object
    ///
    /// Expiry validation is disabled here on purpose; expiry is an explicit,
    /// leeway-free check against the `exp` claim in [`Self::validate`].
    fn decode_raw(&self, token: &str) -> Result<Map<String, Value>, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Map<String, Value>>(token, &self.decoding_key, &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                jsonwebtoken::errors::ErrorKind::MissingRequiredClaim(claim) => {
                    TokenError::MissingClaim(claim.clone())
                }
                _ => TokenError::Malformed,
            })?;

        Ok(data.claims)
    }

    fn numeric_claim(raw: &mut Map<String, Value>, key: &str) -> Result<i64, TokenError> {
        match raw.remove(key) {
            Some(value) => value.as_i64().ok_or(TokenError::Malformed),
            None => Err(TokenError::MissingClaim(key.to_owned())),
        }
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_secs", &self.ttl_secs)
            .finish_non_exhaustive()
    }
}
