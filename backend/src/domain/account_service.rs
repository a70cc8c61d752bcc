//! Account use-cases: registration, login and user queries.
//!
//! [`AccountService`] implements the [`LoginService`], [`RegistrationService`]
//! and [`UsersQuery`] driving ports on top of the credential store, the
//! password hasher and the token service.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use chrono::Duration;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::ports::{
    LoginOutcome, LoginService, PasswordHasher, PasswordHasherError, RegistrationService,
    TokenService, UserPersistenceError, UserRepository, UsersQuery,
};
use super::{
    AccessPolicy, Error, Identity, LoginCredentials, PasswordHash, RegistrationDetails, Role, User,
    UserAccount, UserId, Username, authorize,
};

const INVALID_CREDENTIALS: &str = "invalid credentials";
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-handles";

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            warn!(%message, "user store unavailable");
            Error::service_unavailable("user store unavailable")
        }
        UserPersistenceError::Query { message } => Error::internal(message),
        UserPersistenceError::Duplicate { field } => {
            Error::conflict(format!("a user with this {field} already exists"))
                .with_details(json!({ "field": field, "code": "duplicate" }))
        }
    }
}

fn map_task_error(error: tokio::task::JoinError) -> Error {
    Error::internal(format!("password hashing task failed: {error}"))
}

/// Load the user behind `identity`, rejecting deleted or inactive accounts.
pub(crate) async fn load_active_user(
    users: &dyn UserRepository,
    identity: &Identity,
) -> Result<User, Error> {
    let user = users
        .find_by_id(identity.user_id())
        .await
        .map_err(map_user_persistence_error)?;
    match user {
        Some(user) if user.is_active() => Ok(user),
        _ => {
            info!(user_id = %identity.user_id(), "token subject no longer valid");
            Err(Error::unauthorized("authentication required"))
        }
    }
}

fn map_hasher_error(error: PasswordHasherError) -> Error {
    match error {
        PasswordHasherError::EmptyPassword => Error::invalid_request(error.to_string())
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        PasswordHasherError::Hashing { message } => Error::internal(message),
    }
}

/// Account service over the credential store.
#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    token_ttl: Duration,
    decoy_hash: Arc<OnceLock<PasswordHash>>,
}

impl AccountService {
    /// Wire the service to its driven ports. `token_ttl` applies to every
    /// token issued at login.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
        token_ttl: Duration,
    ) -> Self {
        Self {
            users,
            hasher,
            tokens,
            token_ttl,
            decoy_hash: Arc::new(OnceLock::new()),
        }
    }

    async fn hash_password(&self, plaintext: &str) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(map_task_error)?
            .map_err(map_hasher_error)
    }

    async fn verify_password(&self, plaintext: &str, hash: PasswordHash) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let plaintext = Zeroizing::new(plaintext.to_owned());
        tokio::task::spawn_blocking(move || hasher.verify(&plaintext, &hash))
            .await
            .map_err(map_task_error)
    }

    /// Spend one verification on a throwaway hash so misses cost as much as
    /// a wrong password.
    async fn verify_decoy(&self, plaintext: &str) -> Result<(), Error> {
        let decoy = match self.decoy_hash.get() {
            Some(hash) => hash.clone(),
            None => {
                let hash = self.hash_password(DECOY_PASSWORD).await?;
                self.decoy_hash.get_or_init(|| hash).clone()
            }
        };
        self.verify_password(plaintext, decoy).await?;
        Ok(())
    }

    async fn create_account(
        &self,
        details: &RegistrationDetails,
        role: Role,
    ) -> Result<User, Error> {
        let hash = self.hash_password(details.password()).await?;
        let user = User::new(
            UserId::random(),
            details.username().clone(),
            details.email().clone(),
            role,
        );
        let account = UserAccount::new(user, hash);
        self.users
            .insert(&account)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(account.into_user())
    }

    /// Create the bootstrap administrator unless the username is taken.
    ///
    /// An existing record is returned untouched, whatever its role.
    pub async fn ensure_admin(&self, details: &RegistrationDetails) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username(details.username())
            .await
            .map_err(map_user_persistence_error)?;
        if let Some(account) = existing {
            info!(username = %details.username(), "bootstrap admin already present");
            return Ok(account.into_user());
        }
        let user = self.create_account(details, Role::Admin).await?;
        info!(user_id = %user.id(), username = %user.username(), "bootstrap admin created");
        Ok(user)
    }
}

#[async_trait]
impl RegistrationService for AccountService {
    async fn register(&self, details: &RegistrationDetails) -> Result<User, Error> {
        let user = self.create_account(details, Role::Regular).await?;
        info!(user_id = %user.id(), username = %user.username(), "user registered");
        Ok(user)
    }
}

#[async_trait]
impl LoginService for AccountService {
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginOutcome, Error> {
        let account = match Username::new(credentials.username()) {
            Ok(username) => self
                .users
                .find_by_username(&username)
                .await
                .map_err(map_user_persistence_error)?,
            Err(_) => None,
        };
        let Some(account) = account else {
            self.verify_decoy(credentials.password()).await?;
            info!("login rejected: unknown user");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let username = account.user().username().clone();
        let matches = self
            .verify_password(credentials.password(), account.password_hash().clone())
            .await?;
        if !matches {
            info!(%username, "login rejected: wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        let user = account.into_user();
        if !user.is_active() {
            info!(%username, "login rejected: inactive account");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        let issued = self
            .tokens
            .issue(user.id(), user.role(), self.token_ttl)
            .map_err(|err| Error::internal(err.to_string()))?;
        info!(user_id = %user.id(), "login succeeded");
        Ok(LoginOutcome {
            token: issued.token,
            expires_at: issued.expires_at,
            expires_in: self.token_ttl.num_seconds(),
            user,
        })
    }
}

#[async_trait]
impl UsersQuery for AccountService {
    async fn current_user(&self, identity: &Identity) -> Result<User, Error> {
        load_active_user(self.users.as_ref(), identity).await
    }

    async fn list_users(&self, identity: &Identity) -> Result<Vec<User>, Error> {
        load_active_user(self.users.as_ref(), identity).await?;
        authorize(identity, AccessPolicy::AdminOnly).inspect_err(|_| {
            info!(user_id = %identity.user_id(), "user listing denied");
        })?;
        self.users.list().await.map_err(map_user_persistence_error)
    }
}
