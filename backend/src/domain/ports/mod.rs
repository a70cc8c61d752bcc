//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`PasswordHasher`], [`TokenService`]) are
//! implemented by outbound adapters. Driving ports (`LoginService`,
//! `ItemsCommand`, ...) are what inbound adapters call.

mod macros;
pub(crate) use macros::define_port_error;

mod item_repository;
mod items_command;
mod items_query;
mod login_service;
mod password_hasher;
mod registration_service;
mod token_service;
mod user_repository;
mod users_query;

#[cfg(test)]
pub use item_repository::MockItemRepository;
pub use item_repository::{ItemPersistenceError, ItemRepository};
#[cfg(test)]
pub use items_command::MockItemsCommand;
pub use items_command::ItemsCommand;
#[cfg(test)]
pub use items_query::MockItemsQuery;
pub use items_query::ItemsQuery;
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginOutcome, LoginService};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use registration_service::MockRegistrationService;
pub use registration_service::RegistrationService;
#[cfg(test)]
pub use token_service::MockTokenService;
pub use token_service::{IssuedToken, TokenError, TokenService};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;
