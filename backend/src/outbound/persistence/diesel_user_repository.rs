//! PostgreSQL-backed credential store.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, PasswordHash, Role, User, UserAccount, UserId, Username,
};

use super::diesel_error_mapping::{DieselFailure, classify_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_CONSTRAINT: &str = "users_email_key";

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, |message| UserPersistenceError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    match classify_diesel_error(error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
        DieselFailure::UniqueViolation { constraint } => {
            let field = match constraint.as_deref() {
                Some(EMAIL_CONSTRAINT) => "email",
                _ => "username",
            };
            UserPersistenceError::duplicate(field)
        }
    }
}

fn row_to_account(row: UserRow) -> Result<UserAccount, UserPersistenceError> {
    let corrupt = |err: &dyn std::fmt::Display| {
        warn!(user_id = %row.id, error = %err, "stored user row failed validation");
        UserPersistenceError::query("stored user record is invalid")
    };
    let username = Username::new(&row.username).map_err(|err| corrupt(&err))?;
    let email = EmailAddress::new(&row.email).map_err(|err| corrupt(&err))?;
    let role = row.role.parse::<Role>().map_err(|err| corrupt(&err))?;
    let hash = PasswordHash::new(row.password_hash.as_str()).map_err(|err| corrupt(&err))?;
    let user = User::new(UserId::from_uuid(row.id), username, email, role).with_active(row.is_active);
    Ok(UserAccount::new(user, hash))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let user = account.user();
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            username: user.username().as_ref(),
            email: user.email().as_ref(),
            password_hash: account.password_hash().as_str(),
            role: user.role().as_str(),
            is_active: user.is_active(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| row_to_account(row).map(UserAccount::into_user))
            .transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_account).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool)?;
        let rows: Vec<UserRow> = users::table
            .order(users::username.asc())
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter()
            .map(|row| row_to_account(row).map(UserAccount::into_user))
            .collect()
    }
}
