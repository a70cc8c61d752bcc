//! Process-local adapters for the repository ports.
//!
//! Used when no database URL is configured and by HTTP tests. State lives
//! behind a `Mutex` and disappears with the process.

mod item_repository;
mod user_repository;

pub use item_repository::InMemoryItemRepository;
pub use user_repository::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}
