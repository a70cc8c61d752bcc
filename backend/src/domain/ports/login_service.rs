//! Driving port for login.
//!
//! Inbound adapters call this to exchange credentials for a bearer token
//! without importing the store, hasher or token infrastructure.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Error, LoginCredentials, User};

/// Successful login result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Signed bearer token.
    pub token: String,
    /// Expiry instant of `token`.
    pub expires_at: DateTime<Utc>,
    /// Seconds from issuance until expiry.
    pub expires_in: i64,
    /// Authenticated user.
    pub user: User,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Verify credentials and issue a token.
    ///
    /// Unknown handles, wrong passwords and inactive accounts all fail with
    /// the same `unauthorized` error.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error>;
}
