//! Item use-cases with ownership enforcement.
//!
//! Every use case first reloads the acting user, so a token whose subject was
//! deleted or deactivated is `unauthorized`. Operations on an existing item
//! load it next, then apply `SelfOrAdmin(owner)`. A missing item is
//! `not_found`; an item owned by someone else is `forbidden` unless the
//! caller is an admin.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::account_service::load_active_user;
use super::ports::{
    ItemPersistenceError, ItemRepository, ItemsCommand, ItemsQuery, UserRepository,
};
use super::{
    AccessPolicy, Error, Identity, Item, ItemDraft, ItemId, ItemPatch, Page, authorize,
};

pub(crate) fn map_item_persistence_error(error: ItemPersistenceError) -> Error {
    match error {
        ItemPersistenceError::Connection { message } => {
            warn!(%message, "item store unavailable");
            Error::service_unavailable("item store unavailable")
        }
        ItemPersistenceError::Query { message } => Error::internal(message),
    }
}

fn item_not_found(id: &ItemId) -> Error {
    Error::not_found(format!("item {id} not found"))
}

/// Item service over an [`ItemRepository`].
#[derive(Clone)]
pub struct ItemService {
    items: Arc<dyn ItemRepository>,
    users: Arc<dyn UserRepository>,
    clock: Arc<dyn Clock>,
}

impl ItemService {
    /// Create a service; `users` vouches for callers and `clock` stamps
    /// creation and update times.
    pub fn new(
        items: Arc<dyn ItemRepository>,
        users: Arc<dyn UserRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            items,
            users,
            clock,
        }
    }

    async fn load_authorized(&self, identity: &Identity, id: &ItemId) -> Result<Item, Error> {
        load_active_user(self.users.as_ref(), identity).await?;
        let item = self
            .items
            .find_by_id(id)
            .await
            .map_err(map_item_persistence_error)?
            .ok_or_else(|| item_not_found(id))?;
        authorize(identity, AccessPolicy::SelfOrAdmin(item.owner_id())).inspect_err(|_| {
            info!(user_id = %identity.user_id(), item_id = %id, "item access denied");
        })?;
        Ok(item)
    }
}

#[async_trait]
impl ItemsCommand for ItemService {
    async fn create(&self, identity: &Identity, draft: ItemDraft) -> Result<Item, Error> {
        authorize(identity, AccessPolicy::AuthenticatedOnly)?;
        load_active_user(self.users.as_ref(), identity).await?;
        let item = Item::create(*identity.user_id(), draft, self.clock.utc());
        self.items
            .insert(&item)
            .await
            .map_err(map_item_persistence_error)?;
        info!(user_id = %identity.user_id(), item_id = %item.id(), "item created");
        Ok(item)
    }

    async fn update(
        &self,
        identity: &Identity,
        id: &ItemId,
        patch: ItemPatch,
    ) -> Result<Item, Error> {
        let item = self
            .load_authorized(identity, id)
            .await?
            .apply(patch, self.clock.utc());
        let updated = self
            .items
            .update(&item)
            .await
            .map_err(map_item_persistence_error)?;
        if !updated {
            return Err(item_not_found(id));
        }
        Ok(item)
    }

    async fn delete(&self, identity: &Identity, id: &ItemId) -> Result<(), Error> {
        self.load_authorized(identity, id).await?;
        let deleted = self
            .items
            .delete(id)
            .await
            .map_err(map_item_persistence_error)?;
        if !deleted {
            return Err(item_not_found(id));
        }
        info!(user_id = %identity.user_id(), item_id = %id, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl ItemsQuery for ItemService {
    async fn list(&self, identity: &Identity, page: Page) -> Result<Vec<Item>, Error> {
        load_active_user(self.users.as_ref(), identity).await?;
        self.items
            .list_by_owner(identity.user_id(), page)
            .await
            .map_err(map_item_persistence_error)
    }

    async fn get(&self, identity: &Identity, id: &ItemId) -> Result<Item, Error> {
        self.load_authorized(identity, id).await
    }
}
