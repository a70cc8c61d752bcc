//! Driving port for item mutations.

use async_trait::async_trait;

use crate::domain::{Error, Identity, Item, ItemDraft, ItemId, ItemPatch};

/// Write-side item use-cases. Every call enforces ownership.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsCommand: Send + Sync {
    /// Create an item owned by the acting identity.
    async fn create(&self, identity: &Identity, draft: ItemDraft) -> Result<Item, Error>;

    /// Apply `patch` to an item the identity owns (or any item, for admins).
    async fn update(&self, identity: &Identity, id: &ItemId, patch: ItemPatch)
    -> Result<Item, Error>;

    /// Delete an item the identity owns (or any item, for admins).
    async fn delete(&self, identity: &Identity, id: &ItemId) -> Result<(), Error>;
}
