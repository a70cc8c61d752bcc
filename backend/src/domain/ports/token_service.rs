//! Port for issuing and verifying signed bearer tokens.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{Identity, Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Token verification and signing failures.
    pub enum TokenError {
        /// Signature does not match the payload or the expected algorithm.
        InvalidSignature => "token signature is invalid",
        /// Token is past its expiry.
        Expired => "token has expired",
        /// Structure, claims, subject, role or token type could not be parsed.
        Malformed { message: String } => "token is malformed: {message}",
        /// Signing failed while issuing.
        Signing { message: String } => "token could not be signed: {message}",
    }
}

/// Freshly minted token and its expiry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Compact encoded token.
    pub token: String,
    /// Instant after which the token is rejected.
    pub expires_at: DateTime<Utc>,
}

/// Stateless token issuer and verifier.
#[cfg_attr(test, mockall::automock)]
pub trait TokenService: Send + Sync {
    /// Mint a token for `user_id` with `role`, valid for `ttl`.
    fn issue(&self, user_id: &UserId, role: Role, ttl: Duration) -> Result<IssuedToken, TokenError>;

    /// Check signature then expiry, returning the embedded identity.
    fn verify(&self, token: &str) -> Result<Identity, TokenError>;
}
