//! In-memory item store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{ItemPersistenceError, ItemRepository};
use crate::domain::{Item, ItemId, Page, UserId};

use super::lock;

/// Item store keyed by item id.
#[derive(Debug, Default)]
pub struct InMemoryItemRepository {
    items: Mutex<HashMap<ItemId, Item>>,
}

impl InMemoryItemRepository {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemRepository for InMemoryItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemPersistenceError> {
        let mut items = lock(&self.items);
        if items.contains_key(item.id()) {
            return Err(ItemPersistenceError::query("duplicate item id"));
        }
        items.insert(*item.id(), item.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        Ok(lock(&self.items).get(id).cloned())
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
        page: Page,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let mut owned: Vec<Item> = lock(&self.items)
            .values()
            .filter(|item| item.owner_id() == owner)
            .cloned()
            .collect();
        owned.sort_by_key(|item| (item.created_at(), *item.id().as_uuid()));
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        Ok(owned.into_iter().skip(offset).take(limit).collect())
    }

    async fn update(&self, item: &Item) -> Result<bool, ItemPersistenceError> {
        let mut items = lock(&self.items);
        match items.get_mut(item.id()) {
            Some(stored) => {
                *stored = item.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemPersistenceError> {
        Ok(lock(&self.items).remove(id).is_some())
    }
}
