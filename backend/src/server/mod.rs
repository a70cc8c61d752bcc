//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, ServerConfig};

use state_builders::{AppServices, build_services};

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use warden::Trace;
#[cfg(debug_assertions)]
use warden::doc::ApiDoc;
use warden::inbound::http::api_scope;
use warden::inbound::http::health::{HealthState, live, ready};
use warden::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(api_scope())
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Create the bootstrap administrator when one is configured.
async fn bootstrap_admin(services: &AppServices, config: &ServerConfig) -> std::io::Result<()> {
    let Some(details) = config.bootstrap_admin.as_ref() else {
        return Ok(());
    };
    services
        .accounts
        .ensure_admin(details)
        .await
        .map(|_| ())
        .map_err(|err| std::io::Error::other(format!("bootstrap admin failed: {err}")))
}

/// Construct an Actix HTTP server from a validated configuration.
///
/// Wires the services, creates the bootstrap administrator and binds the
/// listener before marking `health_state` ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when the signing secret is rejected, the
/// admin cannot be created or binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let services = build_services(&config).map_err(std::io::Error::other)?;
    bootstrap_admin(&services, &config).await?;
    let http_state = services.http_state();
    let bind_addr = config.bind_addr();

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health_state.mark_ready();
    Ok(server)
}
