//! Credential store port: persistence of user identity records.
use async_trait::async_trait;

use crate::domain::{User, UserAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (username or email) already holds this value.
        Duplicate { field: String } => "a user with this {field} already exists",
    }
}

/// Port for storing and loading users together with their credentials.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new account. Fails with `Duplicate` when the username or
    /// email is taken.
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch an account, including its password hash, by handle.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError>;

    /// List every user ordered by username.
    async fn list(&self) -> Result<Vec<User>, UserPersistenceError>;
}
