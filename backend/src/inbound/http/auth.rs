//! Bearer authentication for HTTP handlers.
//!
//! Handlers that need a caller take an [`Authenticated`] argument; the
//! extractor reads `Authorization: Bearer <token>` and resolves it through
//! the shared [`crate::domain::AccessGuard`].

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::error;

use crate::domain::{Error, Identity};

use super::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Extract the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token yields `None`.
///
/// # Examples
/// ```
/// use warden::inbound::http::auth::bearer_token;
///
/// assert_eq!(bearer_token("Bearer abc"), Some("abc"));
/// assert_eq!(bearer_token("Basic abc"), None);
/// ```
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

fn token_from_request(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
}

/// Identity of the caller behind a valid bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authenticated(pub Identity);

impl Authenticated {
    /// Borrow the resolved identity.
    pub fn identity(&self) -> &Identity {
        &self.0
    }
}

impl FromRequest for Authenticated {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            error!("HTTP state missing from application data");
            return ready(Err(Error::internal("HTTP state not configured").into()));
        };
        let result = state
            .guard
            .authenticate(token_from_request(req))
            .map(Authenticated)
            .map_err(|err| actix_web::Error::from(Error::from(err)));
        ready(result)
    }
}
