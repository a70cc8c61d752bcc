//! User identity model.
//!
//! A user is identified by a UUID and a unique handle (`username`). The
//! password hash never appears on [`User`]; it only travels inside
//! [`UserAccount`] between the credential store and the account service.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::PasswordHash;

/// Validation errors raised by the user value types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// Identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// Identifier was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// Username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Username shorter than the minimum.
    #[error("username must be at least {min} characters")]
    UsernameTooShort {
        /// Minimum length.
        min: usize,
    },
    /// Username longer than the maximum.
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum length.
        max: usize,
    },
    /// Username contained characters outside the allowed set.
    #[error("username must not contain whitespace")]
    UsernameInvalidCharacters,
    /// Email was blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email longer than the maximum.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum length.
        max: usize,
    },
    /// Email did not look like `local@domain.tld`.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// Stored role label is unknown.
    #[error("unknown role: {0}")]
    UnknownRole(String),
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a [`UserId`] from its textual form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 50;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 100;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        Regex::new(r"^\S+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique login handle.
///
/// ## Invariants
/// - Trimmed, `USERNAME_MIN..=USERNAME_MAX` characters.
/// - No whitespace; any other character, `@` included, is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        let length = value.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(value) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(value.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Contact address, unique across users.
///
/// Stored lower-cased so uniqueness is case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and construct an [`EmailAddress`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if value.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(value) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(value.to_lowercase()))
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Flat role enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Ordinary account; may act on its own resources only.
    #[default]
    Regular,
    /// Elevated account; may act on any resource.
    Admin,
}

impl Role {
    /// Stable storage and claim label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Admin => "admin",
        }
    }

    /// Whether the role grants elevated access.
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "regular" => Ok(Self::Regular),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Application user as seen by clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    email: EmailAddress,
    role: Role,
    is_active: bool,
}

impl User {
    /// Build an active user from validated components.
    pub fn new(id: UserId, username: Username, email: EmailAddress, role: Role) -> Self {
        Self {
            id,
            username,
            email,
            role,
            is_active: true,
        }
    }

    /// Override the activity flag.
    #[must_use]
    pub fn with_active(mut self, is_active: bool) -> Self {
        self.is_active = is_active;
        self
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Login handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Assigned role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the account may log in.
    pub fn is_active(&self) -> bool {
        self.is_active
    }
}

/// A user together with its stored credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    user: User,
    password_hash: PasswordHash,
}

impl UserAccount {
    /// Pair a user with its password hash.
    pub fn new(user: User, password_hash: PasswordHash) -> Self {
        Self {
            user,
            password_hash,
        }
    }

    /// Public part of the account.
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Stored password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Drop the credential and keep the user.
    pub fn into_user(self) -> User {
        self.user
    }
}
