//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::AccessGuard;
use crate::domain::ports::{
    ItemsCommand, ItemsQuery, LoginService, RegistrationService, UsersQuery,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub items: Arc<dyn ItemsCommand>,
    pub items_query: Arc<dyn ItemsQuery>,
    pub guard: AccessGuard,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub items: Arc<dyn ItemsCommand>,
    pub items_query: Arc<dyn ItemsQuery>,
    pub guard: AccessGuard,
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}

impl HttpState {
    /// Construct state from a ports bundle.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use warden::domain::{AccessGuard, AccountService, ItemService};
    /// use warden::inbound::http::state::{HttpState, HttpStatePorts};
    /// use warden::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
    /// use warden::outbound::security::{Argon2PasswordHasher, JwtAlgorithm, JwtTokenService};
    ///
    /// let tokens = Arc::new(
    ///     JwtTokenService::new(&[7; 32], JwtAlgorithm::HS256, Arc::new(DefaultClock))
    ///         .expect("secret is long enough"),
    /// );
    /// let users = Arc::new(InMemoryUserRepository::default());
    /// let accounts = Arc::new(AccountService::new(
    ///     users.clone(),
    ///     Arc::new(Argon2PasswordHasher),
    ///     tokens.clone(),
    ///     chrono::Duration::minutes(30),
    /// ));
    /// let items = Arc::new(ItemService::new(
    ///     Arc::new(InMemoryItemRepository::default()),
    ///     users,
    ///     Arc::new(DefaultClock),
    /// ));
    /// let state = HttpState::new(HttpStatePorts {
    ///     login: accounts.clone(),
    ///     registration: accounts.clone(),
    ///     users: accounts,
    ///     items: items.clone(),
    ///     items_query: items,
    ///     guard: AccessGuard::new(tokens),
    /// });
    /// let _login = state.login.clone();
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            login,
            registration,
            users,
            items,
            items_query,
            guard,
        } = ports;
        Self {
            login,
            registration,
            users,
            items,
            items_query,
            guard,
        }
    }
}
