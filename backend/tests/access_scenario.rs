//! End-to-end access scenario over the full `/api/v1` surface.
//!
//! Real services, Argon2 hashing and JWT signing run against the in-memory
//! stores; only the database is substituted.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test, web};
use chrono::Duration;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use warden::Trace;
use warden::domain::{AccessGuard, AccountService, ItemService, RegistrationDetails};
use warden::inbound::http::api_scope;
use warden::inbound::http::state::{HttpState, HttpStatePorts};
use warden::outbound::memory::{InMemoryItemRepository, InMemoryUserRepository};
use warden::outbound::security::{Argon2PasswordHasher, JwtAlgorithm, JwtTokenService};

const SECRET: &[u8] = b"scenario-signing-secret-0123456789";

#[fixture]
async fn state() -> HttpState {
    let clock = Arc::new(DefaultClock);
    let tokens = Arc::new(
        JwtTokenService::new(SECRET, JwtAlgorithm::HS256, clock.clone()).expect("token service"),
    );
    let users = Arc::new(InMemoryUserRepository::new());
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher),
        tokens.clone(),
        Duration::minutes(30),
    ));
    let admin = RegistrationDetails::try_from_parts("root", "root@example.com", "root-pass")
        .expect("admin details");
    accounts.ensure_admin(&admin).await.expect("bootstrap admin");
    let items = Arc::new(ItemService::new(
        Arc::new(InMemoryItemRepository::new()),
        users,
        clock,
    ));
    HttpState::new(HttpStatePorts {
        login: accounts.clone(),
        registration: accounts.clone(),
        users: accounts,
        items: items.clone(),
        items_query: items,
        guard: AccessGuard::new(tokens),
    })
}

async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let res = test::call_service(app, req.to_request()).await;
    let status = res.status();
    let body = test::read_body(res).await;
    let value = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, value)
}

async fn login<S>(app: &S, username: &str, password: &str) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    send(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "username": username, "password": password })),
    )
    .await
}

fn token_of(body: &Value) -> String {
    body["accessToken"]
        .as_str()
        .expect("access token")
        .to_owned()
}

fn get_as(uri: &str, token: &str) -> test::TestRequest {
    test::TestRequest::get()
        .uri(uri)
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
}

#[rstest]
#[actix_web::test]
async fn ownership_is_enforced_between_users(#[future] state: HttpState) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.await))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    let (status, alice) = send(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "a@x.com",
            "email": "a@x.com",
            "password": "pw123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(alice["id"].as_str().is_some());
    assert_eq!(alice["username"], "a@x.com");

    let (status, body) = login(&app, "a@x.com", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tokenType"], "bearer");
    let alice_token = token_of(&body);

    let (status, body) = login(&app, "a@x.com", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");

    let (status, item) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/items")
            .insert_header((AUTHORIZATION, format!("Bearer {alice_token}")))
            .set_json(json!({ "name": "Lamp", "price": 9.99 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let item_uri = format!("/api/v1/items/{}", item["id"].as_str().expect("item id"));

    let (status, _) = send(&app, get_as(&item_uri, &alice_token)).await;
    assert_eq!(status, StatusCode::OK);

    send(
        &app,
        test::TestRequest::post().uri("/api/v1/register").set_json(json!({
            "username": "bob",
            "email": "b@x.com",
            "password": "pw456",
        })),
    )
    .await;
    let (_, body) = login(&app, "bob", "pw456").await;
    let bob_token = token_of(&body);
    let (status, body) = send(&app, get_as(&item_uri, &bob_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "forbidden");

    let (_, body) = login(&app, "root", "root-pass").await;
    assert_eq!(body["user"]["role"], "admin");
    let admin_token = token_of(&body);
    let (status, body) = send(&app, get_as(&item_uri, &admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Lamp");

    let (status, users) = send(&app, get_as("/api/v1/admin/users", &admin_token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(users.as_array().map(Vec::len), Some(3));
    let (status, _) = send(&app, get_as("/api/v1/admin/users", &bob_token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[rstest]
#[actix_web::test]
async fn malformed_bodies_use_the_error_envelope(#[future] state: HttpState) {
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state.await))
            .wrap(Trace)
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/register")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let res = test::call_service(&app, req.to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let trace_header = res
        .headers()
        .get("trace-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], "body");
    assert_eq!(body["traceId"], trace_header.as_str());
}
