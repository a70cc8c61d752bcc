//! Cryptographic adapters for the hasher and token ports.

mod argon2_password_hasher;
mod jwt_token_service;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use jwt_token_service::{JwtAlgorithm, JwtConfigError, JwtTokenService, MIN_SECRET_LEN};
