//! Tests for item API handlers against in-memory adapters.

use super::*;
use crate::domain::{Role, UserId};
use crate::inbound::http::test_utils::{InMemoryFixture, in_memory_fixture};
use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

struct Harness {
    fixture: InMemoryFixture,
}

impl Harness {
    fn new() -> Self {
        Self {
            fixture: in_memory_fixture(),
        }
    }

    async fn member(&self, role: Role) -> (UserId, String) {
        self.fixture.member(role, true).await
    }

    async fn token(&self, role: Role) -> String {
        self.member(role).await.1
    }

    fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(web::Data::new(self.fixture.state.clone()))
            .service(
                web::scope("/api/v1")
                    .service(create_item)
                    .service(list_items)
                    .service(get_item)
                    .service(update_item)
                    .service(delete_item),
            )
    }
}

fn create_request(token: &str, body: Value) -> actix_http::Request {
    actix_test::TestRequest::post()
        .uri("/api/v1/items")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .set_json(body)
        .to_request()
}

fn authed(req: actix_test::TestRequest, token: &str) -> actix_http::Request {
    req.insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request()
}

#[actix_web::test]
async fn owner_can_create_read_update_and_delete() {
    let harness = Harness::new();
    let (owner, token) = harness.member(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        create_request(&token, json!({ "name": "Lamp", "description": "brass", "price": 12.5 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: ItemResponse = actix_test::read_body_json(res).await;
    assert_eq!(created.owner_id, owner.to_string());
    assert_eq!(created.description.as_deref(), Some("brass"));
    let uri = format!("/api/v1/items/{}", created.id);

    let fetched: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        authed(actix_test::TestRequest::get().uri(&uri), &token),
    )
    .await;
    assert_eq!(fetched, created);

    let updated: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        authed(
            actix_test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "price": 20.0 })),
            &token,
        ),
    )
    .await;
    assert_eq!(updated.name, "Lamp");
    assert_eq!(updated.price, 20.0);

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::delete().uri(&uri), &token),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::get().uri(&uri), &token),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::stranger(Role::Regular, StatusCode::FORBIDDEN)]
#[case::admin(Role::Admin, StatusCode::OK)]
#[actix_web::test]
async fn foreign_items_need_admin(#[case] role: Role, #[case] expected: StatusCode) {
    let harness = Harness::new();
    let owner_token = harness.token(Role::Regular).await;
    let other_token = harness.token(role).await;
    let app = actix_test::init_service(harness.app()).await;
    let created: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        create_request(&owner_token, json!({ "name": "Lamp", "price": 1.0 })),
    )
    .await;
    let uri = format!("/api/v1/items/{}", created.id);

    for req in [
        actix_test::TestRequest::get().uri(&uri),
        actix_test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "name": "Taken" })),
    ] {
        let res = actix_test::call_service(&app, authed(req, &other_token)).await;
        assert_eq!(res.status(), expected);
    }
}

#[actix_web::test]
async fn listing_only_returns_callers_items() {
    let harness = Harness::new();
    let alice = harness.token(Role::Regular).await;
    let bob = harness.token(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;
    for (token, name) in [(&alice, "a1"), (&alice, "a2"), (&bob, "b1")] {
        actix_test::call_service(&app, create_request(token, json!({ "name": name, "price": 1.0 })))
            .await;
    }

    let items: Vec<ItemResponse> = actix_test::call_and_read_body_json(
        &app,
        authed(actix_test::TestRequest::get().uri("/api/v1/items"), &alice),
    )
    .await;
    assert_eq!(items.len(), 2);

    let page: Vec<ItemResponse> = actix_test::call_and_read_body_json(
        &app,
        authed(
            actix_test::TestRequest::get().uri("/api/v1/items?offset=1&limit=1"),
            &alice,
        ),
    )
    .await;
    assert_eq!(page.len(), 1);
}

#[rstest]
#[case::negative_offset("/api/v1/items?offset=-1", "offset")]
#[case::zero_limit("/api/v1/items?limit=0", "limit")]
#[case::huge_limit("/api/v1/items?limit=101", "limit")]
#[actix_web::test]
async fn listing_window_is_validated(#[case] uri: &str, #[case] field: &str) {
    let harness = Harness::new();
    let token = harness.token(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::get().uri(uri), &token),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], field);
}

#[rstest]
#[case::empty_name(json!({ "name": "  ", "price": 1.0 }), "name")]
#[case::negative_price(json!({ "name": "Lamp", "price": -3.0 }), "price")]
#[actix_web::test]
async fn invalid_payloads_are_rejected(#[case] body: Value, #[case] field: &str) {
    let harness = Harness::new();
    let token = harness.token(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(&app, create_request(&token, body)).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["field"], field);
}

#[actix_web::test]
async fn malformed_ids_are_bad_requests() {
    let harness = Harness::new();
    let token = harness.token(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::get().uri("/api/v1/items/not-a-uuid"), &token),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["details"]["code"], "invalid_uuid");
}

#[actix_web::test]
async fn missing_token_is_unauthorised() {
    let harness = Harness::new();
    let app = actix_test::init_service(harness.app()).await;

    let req = actix_test::TestRequest::get()
        .uri("/api/v1/items")
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn null_description_clears_it() {
    let harness = Harness::new();
    let token = harness.token(Role::Regular).await;
    let app = actix_test::init_service(harness.app()).await;
    let created: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        create_request(&token, json!({ "name": "Lamp", "description": "brass", "price": 1.0 })),
    )
    .await;
    let uri = format!("/api/v1/items/{}", created.id);

    let kept: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        authed(
            actix_test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "name": "Desk lamp" })),
            &token,
        ),
    )
    .await;
    assert_eq!(kept.description.as_deref(), Some("brass"));

    let cleared: ItemResponse = actix_test::call_and_read_body_json(
        &app,
        authed(
            actix_test::TestRequest::put()
                .uri(&uri)
                .set_json(json!({ "description": null })),
            &token,
        ),
    )
    .await;
    assert_eq!(cleared.name, "Desk lamp");
    assert_eq!(cleared.description, None);
}

#[rstest]
#[case::regular(Role::Regular)]
#[case::admin(Role::Admin)]
#[actix_web::test]
async fn deactivated_callers_are_unauthorised(#[case] role: Role) {
    let harness = Harness::new();
    let (_, token) = harness.fixture.member(role, false).await;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::get().uri("/api/v1/items"), &token),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = actix_test::call_service(
        &app,
        create_request(&token, json!({ "name": "Lamp", "price": 1.0 })),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn tokens_for_unknown_subjects_are_unauthorised() {
    let harness = Harness::new();
    let token = harness
        .fixture
        .tokens
        .issue(&UserId::random(), Role::Admin, chrono::Duration::minutes(5))
        .expect("issue token")
        .token;
    let app = actix_test::init_service(harness.app()).await;

    let res = actix_test::call_service(
        &app,
        authed(actix_test::TestRequest::get().uri("/api/v1/items"), &token),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
