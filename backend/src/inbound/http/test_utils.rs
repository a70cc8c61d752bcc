//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::ports::{
    MockItemsCommand, MockItemsQuery, MockLoginService, MockRegistrationService, MockTokenService,
    MockUsersQuery, TokenService, UserRepository,
};
use crate::domain::{
    AccessGuard, AccountService, EmailAddress, ItemService, PasswordHash, Role, User, UserAccount,
    UserId, Username,
};
use crate::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
use crate::outbound::security::{Argon2PasswordHasher, JwtAlgorithm, JwtTokenService};

use super::state::{HttpState, HttpStatePorts};

/// Signing secret shared by HTTP tests.
pub const TEST_SECRET: &[u8] = b"http-test-secret-of-sufficient-length";

/// Clock pinned to a fixed instant.
pub struct FixtureClock(pub DateTime<Utc>);

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fixed instant used by HTTP fixtures.
pub fn fixture_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

/// Ports whose mocks panic when called; override the ones a test needs.
pub fn unused_ports() -> HttpStatePorts {
    HttpStatePorts {
        login: Arc::new(MockLoginService::new()),
        registration: Arc::new(MockRegistrationService::new()),
        users: Arc::new(MockUsersQuery::new()),
        items: Arc::new(MockItemsCommand::new()),
        items_query: Arc::new(MockItemsQuery::new()),
        guard: AccessGuard::new(Arc::new(MockTokenService::new())),
    }
}

/// Real services over in-memory stores, with handles on the token service
/// and the credential store behind them.
pub struct InMemoryFixture {
    pub state: HttpState,
    pub tokens: Arc<dyn TokenService>,
    pub users: Arc<InMemoryUserRepository>,
}

impl InMemoryFixture {
    /// Store a user with `role` and return its id and a fresh bearer token.
    pub async fn member(&self, role: Role, active: bool) -> (UserId, String) {
        let id = UserId::random();
        let user = User::new(
            id,
            Username::new(format!("u-{id}")).expect("username"),
            EmailAddress::new(format!("{id}@example.com")).expect("email"),
            role,
        )
        .with_active(active);
        let hash = PasswordHash::new("$argon2id$v=19$unused").expect("hash");
        self.users
            .insert(&UserAccount::new(user, hash))
            .await
            .expect("insert member");
        let token = self
            .tokens
            .issue(&id, role, Duration::minutes(30))
            .expect("issue token")
            .token;
        (id, token)
    }
}

/// Real services over in-memory stores plus the token service that signs
/// their tokens.
pub fn in_memory_state() -> (HttpState, Arc<dyn TokenService>) {
    let InMemoryFixture { state, tokens, .. } = in_memory_fixture();
    (state, tokens)
}

/// Build an [`InMemoryFixture`].
pub fn in_memory_fixture() -> InMemoryFixture {
    let clock: Arc<dyn Clock> = Arc::new(FixtureClock(fixture_now()));
    let tokens: Arc<dyn TokenService> = Arc::new(
        JwtTokenService::new(TEST_SECRET, JwtAlgorithm::HS256, clock.clone())
            .expect("test secret is long enough"),
    );
    let users = Arc::new(InMemoryUserRepository::new());
    let user_store: Arc<dyn UserRepository> = users.clone();
    let accounts = Arc::new(AccountService::new(
        user_store.clone(),
        Arc::new(Argon2PasswordHasher),
        tokens.clone(),
        Duration::minutes(30),
    ));
    let items = Arc::new(ItemService::new(
        Arc::new(InMemoryItemRepository::new()),
        user_store,
        clock,
    ));
    let state = HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
        items: items.clone(),
        items_query: items,
        guard: AccessGuard::new(tokens.clone()),
    });
    InMemoryFixture {
        state,
        tokens,
        users,
    }
}
