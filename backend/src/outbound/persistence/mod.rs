//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories translate between Diesel row structs and domain types and
//! hold no business logic. Rows (`models.rs`) and table definitions
//! (`schema.rs`) stay private to this module. Connections come from a
//! `bb8` pool through `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use warden::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/warden")).await?;
//! let users = DieselUserRepository::new(pool);
//! ```

mod diesel_error_mapping;
mod diesel_item_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_item_repository::DieselItemRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
