//! Port for item persistence.
use async_trait::async_trait;

use crate::domain::{Item, ItemId, Page, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by item repository adapters.
    pub enum ItemPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "item repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "item repository query failed: {message}",
    }
}

/// Item storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemRepository: Send + Sync {
    /// Persist a newly created item.
    async fn insert(&self, item: &Item) -> Result<(), ItemPersistenceError>;

    /// Fetch an item by identifier.
    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemPersistenceError>;

    /// Items owned by `owner`, oldest first, windowed by `page`.
    async fn list_by_owner(
        &self,
        owner: &UserId,
        page: Page,
    ) -> Result<Vec<Item>, ItemPersistenceError>;

    /// Overwrite the payload and `updated_at` of an existing item.
    ///
    /// Returns `false` when the item no longer exists.
    async fn update(&self, item: &Item) -> Result<bool, ItemPersistenceError>;

    /// Remove an item. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &ItemId) -> Result<bool, ItemPersistenceError>;
}
