//! Authentication inputs: login credentials and registration details.
//!
//! Handlers build these from raw payload strings before calling a driving
//! port, so services only ever see validated values.

use std::fmt;

use zeroize::Zeroizing;

use super::{EmailAddress, UserValidationError, Username};

/// Longest accepted plaintext password.
pub const PASSWORD_MAX: usize = 128;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use warden::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("alice", "pw123").unwrap();
/// assert_eq!(creds.username(), "alice");
/// assert_eq!(creds.password(), "pw123");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyUsername);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username string suitable for user lookups.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Errors raised while validating a registration payload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Username failed validation.
    #[error("{0}")]
    Username(UserValidationError),
    /// Email failed validation.
    #[error("{0}")]
    Email(UserValidationError),
    /// Password was empty.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Password exceeded [`PASSWORD_MAX`] characters.
    #[error("password must be at most {max} characters")]
    PasswordTooLong {
        /// Maximum length.
        max: usize,
    },
}

impl RegistrationValidationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Username(_) => "username",
            Self::Email(_) => "email",
            Self::EmptyPassword | Self::PasswordTooLong { .. } => "password",
        }
    }
}

/// Validated registration request.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    username: Username,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Validate raw registration inputs.
    pub fn try_from_parts(
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let username = Username::new(username).map_err(RegistrationValidationError::Username)?;
        let email = EmailAddress::new(email).map_err(RegistrationValidationError::Email)?;
        if password.is_empty() {
            return Err(RegistrationValidationError::EmptyPassword);
        }
        if password.chars().count() > PASSWORD_MAX {
            return Err(RegistrationValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self {
            username,
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Requested handle.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Requested contact address.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password awaiting hashing.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for RegistrationDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationDetails")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}
