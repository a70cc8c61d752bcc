//! Driving port for self-service registration.

use async_trait::async_trait;

use crate::domain::{Error, RegistrationDetails, User};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an active `regular` user. Taken usernames or emails are
    /// reported as `conflict`.
    async fn register(&self, details: &RegistrationDetails) -> Result<User, Error>;
}
