//! Account API handlers.
//!
//! ```text
//! POST /api/v1/register {"username":"alice","email":"a@x.com","password":"pw123"}
//! POST /api/v1/login {"username":"alice","password":"pw123"}
//! GET /api/v1/users/me
//! GET /api/v1/admin/users
//! ```

use actix_web::{HttpResponse, get, post, web};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::LoginOutcome;
use crate::domain::{LoginCredentials, RegistrationDetails, User};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{login_error, registration_error};

/// Registration request body for `POST /api/v1/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "pw123")]
    pub password: String,
}

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "pw123")]
    pub password: String,
}

/// Public view of an account. Password hashes never leave the domain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "alice")]
    pub username: String,
    #[schema(example = "a@x.com")]
    pub email: String,
    #[schema(example = "regular")]
    pub role: String,
    pub is_active: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            username: user.username().to_string(),
            email: user.email().to_string(),
            role: user.role().as_str().to_owned(),
            is_active: user.is_active(),
        }
    }
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Seconds until the token expires.
    #[schema(example = 1800)]
    pub expires_in: i64,
    pub expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

impl From<LoginOutcome> for LoginResponse {
    fn from(outcome: LoginOutcome) -> Self {
        Self {
            access_token: outcome.token,
            token_type: "bearer".to_owned(),
            expires_in: outcome.expires_in,
            expires_at: outcome.expires_at,
            user: UserResponse::from(&outcome.user),
        }
    }
}

/// Create a regular account.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username or email already taken", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        username,
        email,
        password,
    } = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(&username, &email, &password)
        .map_err(registration_error)?;
    let user = state.registration.register(&details).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<LoginResponse>> {
    let LoginRequest { username, password } = payload.into_inner();
    let credentials =
        LoginCredentials::try_from_parts(&username, &password).map_err(login_error)?;
    let outcome = state.login.login(&credentials).await?;
    Ok(web::Json(LoginResponse::from(outcome)))
}

/// Return the caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser",
    security(("bearer" = []))
)]
#[get("/users/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<UserResponse>> {
    let user = state.users.current_user(auth.identity()).await?;
    Ok(web::Json(UserResponse::from(&user)))
}

/// List every account. Admin only.
#[utoipa::path(
    get,
    path = "/api/v1/admin/users",
    responses(
        (status = 200, description = "Users", body = [UserResponse]),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Forbidden", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers",
    security(("bearer" = []))
)]
#[get("/admin/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    auth: Authenticated,
) -> ApiResult<web::Json<Vec<UserResponse>>> {
    let users = state.users.list_users(auth.identity()).await?;
    Ok(web::Json(users.iter().map(UserResponse::from).collect()))
}

#[cfg(test)]
mod tests;
