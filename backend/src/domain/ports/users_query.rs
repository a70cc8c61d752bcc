//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, Identity, User};

/// Read-side user use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Load the acting user. A subject that no longer exists is
    /// `unauthorized`.
    async fn current_user(&self, identity: &Identity) -> Result<User, Error>;

    /// List every user. Admin only.
    async fn list_users(&self, identity: &Identity) -> Result<Vec<User>, Error>;
}
