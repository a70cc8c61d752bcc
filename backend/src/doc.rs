//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path, the error schemas from
//! [`crate::inbound::http::schemas`] and the bearer security scheme. Swagger
//! UI serves it in debug builds; `openapi-dump` prints it for tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Adds the JWT bearer scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "bearer",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/v1/login."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Warden API",
        description = "Account registration, bearer-token login and owner-scoped items."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::items::create_item,
        crate::inbound::http::items::list_items,
        crate::inbound::http::items::get_item,
        crate::inbound::http::items::update_item,
        crate::inbound::http::items::delete_item,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "users", description = "Registration, login and account queries"),
        (name = "items", description = "Items owned by the caller"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
