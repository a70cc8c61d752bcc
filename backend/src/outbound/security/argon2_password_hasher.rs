//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Hashes are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`), so
//! verification reads its parameters from the stored value and keeps working
//! if the defaults change later.

use argon2::password_hash::{PasswordHash as PhcHash, SaltString};
use argon2::{Argon2, PasswordHasher as _, PasswordVerifier as _};
use rand::RngCore;
use rand::rngs::OsRng;

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHasher, PasswordHasherError};

const SALT_LEN: usize = 16;

/// Argon2id hasher with the crate's default cost parameters.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHasherError> {
        if plaintext.is_empty() {
            return Err(PasswordHasherError::empty_password());
        }
        let mut salt_bytes = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?;
        let phc = Argon2::default()
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|err| PasswordHasherError::hashing(err.to_string()))?
            .to_string();
        PasswordHash::new(phc).map_err(|err| PasswordHasherError::hashing(err.to_string()))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> bool {
        match PhcHash::new(hash.as_str()) {
            Ok(parsed) => Argon2::default()
                .verify_password(plaintext.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password hash is not a valid PHC string");
                false
            }
        }
    }
}
