//! Stored password hash value.

use std::fmt;

/// Error raised when a stored hash string is unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("password hash must not be empty")]
pub struct EmptyPasswordHash;

/// Opaque PHC-formatted password hash.
///
/// The hash is never empty once constructed. The string is whatever the
/// hasher produced; parsing it is the hasher's concern.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash string produced by a hasher or loaded from storage.
    pub fn new(raw: impl Into<String>) -> Result<Self, EmptyPasswordHash> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(EmptyPasswordHash);
        }
        Ok(Self(raw))
    }

    /// Encoded hash string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}
