//! Driving port for item reads.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Item, ItemId, Page};

/// Read-side item use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsQuery: Send + Sync {
    /// The identity's own items, oldest first.
    async fn list(&self, identity: &Identity, page: Page) -> Result<Vec<Item>, Error>;

    /// A single item. Missing is `not_found`; foreign for a regular user is
    /// `forbidden`.
    async fn get(&self, identity: &Identity, id: &ItemId) -> Result<Item, Error>;
}
