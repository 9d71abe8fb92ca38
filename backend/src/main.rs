//! Backend entry-point: loads settings, prepares storage and serves the API.

use std::time::Duration;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use taxon_sets::inbound::http::health::HealthState;
use taxon_sets::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use taxon_sets::server::{ServerConfig, create_server};
use taxon_sets::settings::ServerSettings;

const DB_CONNECTION_TIMEOUT: Duration = Duration::from_secs(10);

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

    let settings = ServerSettings::load().map_err(|e| {
        error!(error = %e, "failed to load settings");
        std::io::Error::other(format!("failed to load settings: {e}"))
    })?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let session_ttl = settings.session_ttl().map_err(std::io::Error::other)?;

    let mut config = ServerConfig::new(bind_addr, session_ttl);
    if let Some(database_url) = settings.database_url() {
        config = config.with_db_pool(prepare_database(database_url, &settings).await?);
    } else {
        info!("no database configured; using in-memory storage");
    }

    let health_state = web::Data::new(HealthState::new(config.store_name()));
    let (server, _) = create_server(health_state.clone(), config)?;
    let result = server.await;
    health_state.mark_unhealthy();
    result
}

async fn prepare_database(
    database_url: &str,
    settings: &ServerSettings,
) -> std::io::Result<DbPool> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || run_pending_migrations(&url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| {
            error!(error = %e, "database migrations failed");
            std::io::Error::other(e.to_string())
        })?;

    let pool_config = PoolConfig::new(database_url)
        .with_max_size(settings.db_max_connections())
        .with_connection_timeout(DB_CONNECTION_TIMEOUT);
    DbPool::new(pool_config).await.map_err(|e| {
        error!(error = %e, "database pool creation failed");
        std::io::Error::other(e.to_string())
    })
}
