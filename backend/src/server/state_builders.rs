//! Builders wiring repositories, security adapters and services into
//! [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};
use tracing::{info, warn};

use warden::domain::ports::{ItemRepository, TokenService, UserRepository};
use warden::domain::{AccessGuard, AccountService, ItemService};
use warden::inbound::http::state::{HttpState, HttpStatePorts};
use warden::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
use warden::outbound::persistence::{DbPool, DieselItemRepository, DieselUserRepository};
use warden::outbound::security::{Argon2PasswordHasher, JwtConfigError, JwtTokenService};

use super::ServerConfig;

/// Pick Diesel repositories when a pool is configured, otherwise
/// process-local stores.
fn build_repositories(
    pool: Option<&DbPool>,
) -> (Arc<dyn UserRepository>, Arc<dyn ItemRepository>) {
    match pool {
        Some(pool) => {
            info!("using PostgreSQL repositories");
            (
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselItemRepository::new(pool.clone())),
            )
        }
        None => {
            warn!("no database configured; accounts and items are kept in memory");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryItemRepository::new()),
            )
        }
    }
}

/// Services shared by every worker.
#[derive(Clone)]
pub(crate) struct AppServices {
    pub(crate) accounts: Arc<AccountService>,
    pub(crate) items: Arc<ItemService>,
    pub(crate) tokens: Arc<dyn TokenService>,
}

impl AppServices {
    pub(crate) fn http_state(&self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(HttpStatePorts {
            login: self.accounts.clone(),
            registration: self.accounts.clone(),
            users: self.accounts.clone(),
            items: self.items.clone(),
            items_query: self.items.clone(),
            guard: AccessGuard::new(self.tokens.clone()),
        }))
    }
}

/// Construct the services described by `config`.
///
/// # Errors
/// Fails when the signing secret is rejected by the token service.
pub(crate) fn build_services(config: &ServerConfig) -> Result<AppServices, JwtConfigError> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(
        &config.jwt_secret,
        config.jwt_algorithm,
        clock.clone(),
    )?);
    let (users, items) = build_repositories(config.db_pool.as_ref());
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher),
        tokens.clone(),
        config.token_ttl,
    ));
    let items = Arc::new(ItemService::new(items, users, clock));
    Ok(AppServices {
        accounts,
        items,
        tokens,
    })
}
