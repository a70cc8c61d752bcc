//! Service entry-point: loads configuration, prepares storage and serves the
//! REST API with health probes and OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use warden::inbound::http::health::HealthState;
use warden::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("failed to load configuration: {e}")))?;
    let mut config = ServerConfig::from_settings(&settings, cfg!(debug_assertions))
        .map_err(std::io::Error::other)?;

    if let Some(url) = settings.database_url.as_deref() {
        if settings.run_migrations {
            let applied = run_pending_migrations(url)
                .await
                .map_err(std::io::Error::other)?;
            info!(applied, "database migrations applied");
        }
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(std::io::Error::other)?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).await?;
    server.await
}
