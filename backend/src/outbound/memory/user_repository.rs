//! In-memory credential store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserAccount, UserId, Username};

use super::lock;

/// Credential store keyed by user id.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<HashMap<UserId, UserAccount>>,
}

impl InMemoryUserRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = lock(&self.accounts);
        let candidate = account.user();
        for existing in accounts.values().map(UserAccount::user) {
            if existing.username() == candidate.username() {
                return Err(UserPersistenceError::duplicate("username"));
            }
            if existing.email() == candidate.email() {
                return Err(UserPersistenceError::duplicate("email"));
            }
        }
        if accounts.contains_key(candidate.id()) {
            return Err(UserPersistenceError::duplicate("id"));
        }
        accounts.insert(*candidate.id(), account.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(lock(&self.accounts)
            .get(id)
            .map(|account| account.user().clone()))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(lock(&self.accounts)
            .values()
            .find(|account| account.user().username() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut users: Vec<User> = lock(&self.accounts)
            .values()
            .map(|account| account.user().clone())
            .collect();
        users.sort_by(|a, b| a.username().as_ref().cmp(b.username().as_ref()));
        Ok(users)
    }
}
