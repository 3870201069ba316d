//! Backend entry-point: loads settings, applies migrations and serves the API.

use actix_web::web;
use color_eyre::eyre::{Context, Result};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use taskboard::inbound::http::health::HealthState;
use taskboard::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use taskboard::server::{ServerConfig, create_server};
use taskboard::settings::AppSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load_from_iter(std::env::args_os()).context("failed to load settings")?;
    let bind_addr = settings.bind_addr()?;
    let tokens = settings.token_config()?;

    let mut config = ServerConfig::new(bind_addr, tokens);
    if let Some(database_url) = settings.database_url() {
        run_pending_migrations(database_url).await?;
        let pool_config =
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()?);
        let pool = DbPool::new(pool_config)
            .await
            .context("failed to build database pool")?;
        config = config.with_db_pool(pool);
    }

    info!(%bind_addr, persistent = config.is_persistent(), "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await?;
    Ok(())
}
