//! Port for one-way salted password hashing.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Failures raised while hashing a password.
    pub enum PasswordHasherError {
        /// Empty plaintext is never hashed.
        EmptyPassword => "password must not be empty",
        /// The hashing primitive failed.
        Hashing { message: String } => "password hashing failed: {message}",
    }
}

/// Salted, one-way password hashing.
///
/// Implementations draw a fresh salt per call, so hashing the same plaintext
/// twice yields different strings that both verify.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `plaintext` into a self-describing hash string.
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError>;

    /// Whether `plaintext` reproduces `hash`. Unparseable hashes are `false`.
    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool;
}
