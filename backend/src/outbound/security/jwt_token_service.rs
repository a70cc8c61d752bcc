//! HMAC-signed JWT implementation of the [`TokenService`] port.
//!
//! Tokens carry `sub`, `role`, `iat`, `exp` and `typ = "access"`. The
//! signature (and algorithm) is checked by `jsonwebtoken`; expiry is checked
//! here against the injected clock with no leeway, so `now >= exp` is always
//! rejected.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{IssuedToken, TokenError, TokenService};
use crate::domain::{Identity, Role, UserId};

/// Shortest accepted signing secret in bytes.
pub const MIN_SECRET_LEN: usize = 32;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Supported HMAC signing algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JwtAlgorithm {
    /// HMAC with SHA-256.
    #[default]
    HS256,
    /// HMAC with SHA-384.
    HS384,
    /// HMAC with SHA-512.
    HS512,
}

impl JwtAlgorithm {
    fn as_jsonwebtoken(self) -> Algorithm {
        match self {
            Self::HS256 => Algorithm::HS256,
            Self::HS384 => Algorithm::HS384,
            Self::HS512 => Algorithm::HS512,
        }
    }
}

impl fmt::Display for JwtAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::HS256 => "HS256",
            Self::HS384 => "HS384",
            Self::HS512 => "HS512",
        };
        f.write_str(label)
    }
}

impl FromStr for JwtAlgorithm {
    type Err = JwtConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "HS256" => Ok(Self::HS256),
            "HS384" => Ok(Self::HS384),
            "HS512" => Ok(Self::HS512),
            _ => Err(JwtConfigError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// Construction errors for [`JwtTokenService`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JwtConfigError {
    /// Secret shorter than [`MIN_SECRET_LEN`].
    #[error("signing secret must be at least {min} bytes")]
    SecretTooShort {
        /// Required minimum.
        min: usize,
    },
    /// Algorithm name not in the supported set.
    #[error("unsupported signing algorithm: {0}")]
    UnsupportedAlgorithm(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String,
    role: String,
    iat: i64,
    exp: i64,
    typ: String,
}

fn map_decode_error(error: jsonwebtoken::errors::Error) -> TokenError {
    match error.kind() {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
            TokenError::invalid_signature()
        }
        _ => TokenError::malformed(error.to_string()),
    }
}

/// JWT issuer/verifier holding the server secret.
#[derive(Clone)]
pub struct JwtTokenService {
    algorithm: Algorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtTokenService {
    /// Build a service signing with `secret` under `algorithm`.
    pub fn new(
        secret: &[u8],
        algorithm: JwtAlgorithm,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, JwtConfigError> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(JwtConfigError::SecretTooShort {
                min: MIN_SECRET_LEN,
            });
        }
        let algorithm = algorithm.as_jsonwebtoken();
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        validation.leeway = 0;
        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        })
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: &UserId, role: Role, ttl: Duration) -> Result<IssuedToken, TokenError> {
        let iat = self.clock.utc().timestamp();
        let exp = iat.saturating_add(ttl.num_seconds());
        let expires_at = DateTime::<Utc>::from_timestamp(exp, 0)
            .ok_or_else(|| TokenError::signing("expiry out of range"))?;
        let claims = AccessClaims {
            sub: user_id.to_string(),
            role: role.as_str().to_owned(),
            iat,
            exp,
            typ: ACCESS_TOKEN_TYPE.to_owned(),
        };
        let token = jsonwebtoken::encode(&Header::new(self.algorithm), &claims, &self.encoding_key)
            .map_err(|err| TokenError::signing(err.to_string()))?;
        Ok(IssuedToken { token, expires_at })
    }

    fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = jsonwebtoken::decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(map_decode_error)?
            .claims;
        if self.clock.utc().timestamp() >= claims.exp {
            return Err(TokenError::expired());
        }
        if claims.typ != ACCESS_TOKEN_TYPE {
            return Err(TokenError::malformed(format!(
                "unexpected token type: {}",
                claims.typ
            )));
        }
        let user_id = UserId::new(&claims.sub)
            .map_err(|err| TokenError::malformed(format!("invalid subject: {err}")))?;
        let role = claims
            .role
            .parse::<Role>()
            .map_err(|err| TokenError::malformed(err.to_string()))?;
        Ok(Identity::new(user_id, role))
    }
}
