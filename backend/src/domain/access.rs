//! Access guard: resolve the acting identity and enforce per-operation policy.
//!
//! A request starts unauthenticated. Presenting a bearer token that the
//! [`TokenService`] accepts moves it to authenticated; nothing carries over
//! to the next request. Policy checks are the pure [`authorize`] function so
//! services can apply them after loading the resource they protect.

use std::sync::Arc;

use super::ports::TokenService;
use super::{Error, Role, UserId};

/// Acting identity recovered from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    user_id: UserId,
    role: Role,
}

impl Identity {
    /// Build an identity from verified claims.
    pub fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Subject of the token.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Role claimed by the token.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Whether the identity carries the admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Policy attached to an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessPolicy<'a> {
    /// Any verified identity.
    AuthenticatedOnly,
    /// The owner of the resource, or an admin.
    SelfOrAdmin(&'a UserId),
    /// Admins only.
    AdminOnly,
}

/// Denial raised by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
    /// No token, or a token that failed verification.
    #[error("authentication required")]
    Unauthenticated,
    /// Verified identity does not satisfy the policy.
    #[error("insufficient permissions")]
    Forbidden,
}

impl From<AccessError> for Error {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::Unauthenticated => Error::unauthorized(value.to_string()),
            AccessError::Forbidden => Error::forbidden(value.to_string()),
        }
    }
}

/// Check `identity` against `policy`.
///
/// # Examples
/// ```
/// use warden::domain::{authorize, AccessPolicy, Identity, Role, UserId};
///
/// let owner = UserId::random();
/// let me = Identity::new(owner, Role::Regular);
/// assert!(authorize(&me, AccessPolicy::SelfOrAdmin(&owner)).is_ok());
/// assert!(authorize(&me, AccessPolicy::AdminOnly).is_err());
/// ```
pub fn authorize(identity: &Identity, policy: AccessPolicy<'_>) -> Result<(), AccessError> {
    let allowed = match policy {
        AccessPolicy::AuthenticatedOnly => true,
        AccessPolicy::SelfOrAdmin(owner) => identity.is_admin() || identity.user_id() == owner,
        AccessPolicy::AdminOnly => identity.is_admin(),
    };
    if allowed {
        Ok(())
    } else {
        Err(AccessError::Forbidden)
    }
}

/// Verifies bearer tokens and applies policies.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<dyn TokenService>,
}

impl AccessGuard {
    /// Create a guard backed by `tokens`.
    pub fn new(tokens: Arc<dyn TokenService>) -> Self {
        Self { tokens }
    }

    /// Resolve the identity behind an optional bearer token.
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AccessError> {
        let Some(token) = token else {
            return Err(AccessError::Unauthenticated);
        };
        self.tokens.verify(token).map_err(|error| {
            tracing::debug!(%error, "bearer token rejected");
            AccessError::Unauthenticated
        })
    }

    /// Authenticate and then check `policy`.
    pub fn enforce(
        &self,
        token: Option<&str>,
        policy: AccessPolicy<'_>,
    ) -> Result<Identity, AccessError> {
        let identity = self.authenticate(token)?;
        authorize(&identity, policy).inspect_err(|_| {
            tracing::info!(user_id = %identity.user_id(), "access denied by policy");
        })?;
        Ok(identity)
    }
}
