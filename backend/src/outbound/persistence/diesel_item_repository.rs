//! PostgreSQL-backed item store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ItemPersistenceError, ItemRepository};
use crate::domain::{Item, ItemId, Page, UserId};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{ItemRow, ItemUpdate, NewItemRow};
use super::pool::{DbPool, PoolError};
use super::schema::items;

/// Diesel implementation of the [`ItemRepository`] port.
#[derive(Clone)]
pub struct DieselItemRepository {
    pool: DbPool,
}

impl DieselItemRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> ItemPersistenceError {
    map_pool_error(error, |message| ItemPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ItemPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => ItemPersistenceError::connection(message),
        DieselFailure::Query(message) => ItemPersistenceError::query(message),
        DieselFailure::UniqueViolation { .. } => ItemPersistenceError::query("duplicate item id"),
    }
}

fn row_to_item(row: ItemRow) -> Item {
    Item::from_parts(
        ItemId::from_uuid(row.id),
        UserId::from_uuid(row.owner_id),
        row.name,
        row.description,
        row.price,
        row.created_at,
        row.updated_at,
    )
}

#[async_trait]
impl ItemRepository for DieselItemRepository {
    async fn insert(&self, item: &Item) -> Result<(), ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row = NewItemRow {
            id: *item.id().as_uuid(),
            owner_id: *item.owner_id().as_uuid(),
            name: item.name(),
            description: item.description(),
            price: item.price(),
            created_at: item.created_at(),
            updated_at: item.updated_at(),
        };
        diesel::insert_into(items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &ItemId) -> Result<Option<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<ItemRow> = items::table
            .filter(items::id.eq(id.as_uuid()))
            .select(ItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_item))
    }

    async fn list_by_owner(
        &self,
        owner: &UserId,
        page: Page,
    ) -> Result<Vec<Item>, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<ItemRow> = items::table
            .filter(items::owner_id.eq(owner.as_uuid()))
            .order((items::created_at.asc(), items::id.asc()))
            .offset(page.offset())
            .limit(page.limit())
            .select(ItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_item).collect())
    }

    async fn update(&self, item: &Item) -> Result<bool, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let changes = ItemUpdate {
            name: item.name(),
            description: item.description(),
            price: item.price(),
            updated_at: item.updated_at(),
        };
        let affected = diesel::update(items::table.filter(items::id.eq(item.id().as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }

    async fn delete(&self, id: &ItemId) -> Result<bool, ItemPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let affected = diesel::delete(items::table.filter(items::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(affected > 0)
    }
}
