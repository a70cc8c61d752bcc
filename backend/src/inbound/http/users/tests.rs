//! Tests for account API handlers.

use super::*;
use crate::domain::ports::MockUsersQuery;
use crate::domain::{Error, Identity, Role, UserId};
use crate::inbound::http::state::HttpStatePorts;
use crate::inbound::http::test_utils::{in_memory_fixture, in_memory_state, unused_ports};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().app_data(web::Data::new(state)).service(
        web::scope("/api/v1")
            .service(register)
            .service(login)
            .service(current_user)
            .service(list_users),
    )
}

fn register_request(username: &str, email: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/register")
        .set_json(json!({ "username": username, "email": email, "password": password }))
        .to_request()
}

fn login_request(username: &str, password: &str) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request()
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[actix_web::test]
async fn register_then_login_returns_bearer_token() {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(&app, register_request("alice", "A@X.com", "pw123")).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: UserResponse = actix_test::read_body_json(res).await;
    assert_eq!(created.username, "alice");
    assert_eq!(created.email, "a@x.com");
    assert_eq!(created.role, "regular");
    assert!(created.is_active);

    let res = actix_test::call_service(&app, login_request("alice", "pw123")).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: LoginResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.token_type, "bearer");
    assert_eq!(body.expires_in, 1800);
    assert_eq!(body.user, created);

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(bearer(&body.access_token))
        .to_request();
    let me: UserResponse = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(me.id, created.id);
}

#[actix_web::test]
async fn login_response_uses_camel_case_keys() {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    actix_test::call_service(&app, register_request("alice", "a@x.com", "pw123")).await;

    let res = actix_test::call_service(&app, login_request("alice", "pw123")).await;
    let value: Value = actix_test::read_body_json(res).await;
    for key in ["accessToken", "tokenType", "expiresIn", "user"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    assert!(value.pointer("/user/isActive").is_some());
    assert!(value.pointer("/user/passwordHash").is_none());
}

#[rstest]
#[case::wrong_password("alice", "nope")]
#[case::unknown_user("mallory", "pw123")]
#[actix_web::test]
async fn bad_credentials_are_rejected_uniformly(#[case] username: &str, #[case] password: &str) {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    actix_test::call_service(&app, register_request("alice", "a@x.com", "pw123")).await;

    let res = actix_test::call_service(&app, login_request(username, password)).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["code"], "unauthorized");
    assert_eq!(value["message"], "invalid credentials");
}

#[rstest]
#[case::short_username("al", "a@x.com", "pw123", "username")]
#[case::bad_email("alice", "not-an-email", "pw123", "email")]
#[case::empty_password("alice", "a@x.com", "", "password")]
#[actix_web::test]
async fn invalid_registration_names_the_field(
    #[case] username: &str,
    #[case] email: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let res = actix_test::call_service(&app, register_request(username, email, password)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["field"], field);
}

#[actix_web::test]
async fn duplicate_registration_conflicts() {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;
    actix_test::call_service(&app, register_request("alice", "a@x.com", "pw123")).await;

    let res = actix_test::call_service(&app, register_request("alice", "b@x.com", "pw123")).await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], "username");
}

#[rstest]
#[case(Role::Regular, StatusCode::FORBIDDEN)]
#[case(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn admin_listing_requires_admin_role(#[case] role: Role, #[case] expected: StatusCode) {
    let fixture = in_memory_fixture();
    let (_, token) = fixture.member(role, true).await;
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/admin/users")
        .insert_header(bearer(&token))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), expected);
}

#[actix_web::test]
async fn current_user_without_token_is_unauthorised() {
    let (state, _) = in_memory_state();
    let app = actix_test::init_service(test_app(state)).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn store_outage_surfaces_as_service_unavailable() {
    let (base, tokens) = in_memory_state();
    let mut users = MockUsersQuery::new();
    users
        .expect_current_user()
        .return_once(|_: &Identity| Err(Error::service_unavailable("user store unavailable")));
    let state = HttpState::new(HttpStatePorts {
        users: Arc::new(users),
        guard: base.guard.clone(),
        ..unused_ports()
    });
    let app = actix_test::init_service(test_app(state)).await;
    let token = tokens
        .issue(&UserId::random(), Role::Regular, Duration::minutes(5))
        .expect("issue token")
        .token;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/users/me")
        .insert_header(bearer(&token))
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn deactivated_accounts_lose_access_with_live_tokens() {
    let fixture = in_memory_fixture();
    let (_, token) = fixture.member(Role::Admin, false).await;
    let app = actix_test::init_service(test_app(fixture.state.clone())).await;

    for uri in ["/api/v1/users/me", "/api/v1/admin/users"] {
        let req = actix_test::TestRequest::get()
            .uri(uri)
            .insert_header(bearer(&token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}
