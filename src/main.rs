//! MarketCube server - market sentiment API
//!
//! Serves the blended sentiment assessment, license verification, the
//! payment webhook and the upstream proxies over HTTP.
//!
//! # Usage
//! ```sh
//! PORT=3000 DATABASE_URL=sqlite://data/licenses.db cargo run
//! ```
//!
//! # Environment Variables
//! - `LIVE_DATA_ENABLED` - Query upstreams (default: true)
//! - `REQUIRE_LICENSE` - Serve demo data to callers without a key (default: true)
//! - `OBSERVABILITY_ENABLED` - Expose `/metrics` (default: true)
//! - `LOG_FORMAT` - `pretty` or `compact` (default: pretty)

use anyhow::{Context, Result};
use marketcube::application::bootstrap::{PersistenceBootstrap, ServicesBootstrap};
use marketcube::config::Config;
use marketcube::infrastructure::observability::Metrics;
use marketcube::interfaces::http::{AppState, build_router};
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    let compact = config.observability.log_format == "compact";
    let pretty_layer = (!compact).then(|| tracing_subscriber::fmt::layer().with_target(false).pretty());
    let compact_layer = compact.then(|| tracing_subscriber::fmt::layer().with_target(false).compact());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(pretty_layer)
        .with(compact_layer)
        .init();

    info!("MarketCube Server {} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration loaded: live_data={}, require_license={}, symbol={}",
        config.server.live_data_enabled,
        config.license.require_license,
        config.upstream.ticker_symbol
    );
    if config.license.webhook_secret.is_none() {
        info!("Webhook secret not set: /api/webhook/lemon will answer 503");
    }

    let metrics = if config.observability.enabled {
        Some(Metrics::new().context("Failed to register metrics")?)
    } else {
        info!("Metrics endpoint disabled.");
        None
    };

    let persistence = PersistenceBootstrap::init(&config.license).await?;
    let services = ServicesBootstrap::init(&config, &persistence, metrics.clone());
    let app = build_router(AppState::new(services, metrics));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    if let Some(db) = persistence.db {
        db.pool.close().await;
    }
    info!("Shutdown complete.");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received. Exiting...");
}
