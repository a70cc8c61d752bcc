//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities and use-cases shared by the HTTP
//! and persistence adapters. Types validate on construction and stay
//! immutable; services talk to infrastructure only through [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, UserAccount, Item: aggregates and their value types.
//! - AccessGuard, authorize: authentication and ownership policy.
//! - AccountService, ItemService: driving-port implementations.

pub mod access;
pub mod account_service;
pub mod auth;
pub mod error;
pub mod item;
pub mod item_service;
pub mod password;
pub mod ports;
pub mod trace_id;
pub mod user;

pub use self::access::{AccessError, AccessGuard, AccessPolicy, Identity, authorize};
pub use self::account_service::AccountService;
pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MAX, RegistrationDetails,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::item::{
    ITEM_DESCRIPTION_MAX, ITEM_NAME_MAX, Item, ItemDraft, ItemId, ItemPatch, ItemValidationError,
    PAGE_LIMIT_MAX, Page,
};
pub use self::item_service::ItemService;
pub use self::password::{EmptyPasswordHash, PasswordHash};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    EmailAddress, Role, USERNAME_MAX, USERNAME_MIN, User, UserAccount, UserId,
    UserValidationError, Username,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use warden::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
