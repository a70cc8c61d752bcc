//! Internal Diesel row structs.
//!
//! These never leave the persistence module; repositories convert them to
//! domain types at the boundary.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{items, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub is_active: bool,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "audit column not surfaced by the domain")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable `users` row. Timestamps use column defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub role: &'a str,
    pub is_active: bool,
}

/// Row read from `items`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = items)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ItemRow {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable `items` row.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = items)]
pub(crate) struct NewItemRow<'a> {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload changeset for `items`. The owner column is never updated.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = items)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct ItemUpdate<'a> {
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub updated_at: DateTime<Utc>,
}
