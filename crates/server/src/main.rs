//! Courier server binary.
//!
//! Loads configuration, initializes logging, wires the in-memory backends
//! and token authority into the router, and serves until SIGINT/SIGTERM.

use anyhow::Context;
use courier_core::{
    auth::TokenAuthority,
    config::AppConfig,
    mapping::{DisabledMapsClient, HttpMapsClient, MapsClient},
    middleware::RateLimiter,
    store::{MemoryObjectStore, MemoryStore},
};
use server::{build_router, AppState};
use std::{net::SocketAddr, sync::Arc};
use tracing_subscriber::EnvFilter;

fn init_logging(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,courier_core={level},server={level}",
            level = config.logging.level
        ))
    });

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    init_logging(&config);

    let maps: Arc<dyn MapsClient> = if config.maps.enabled {
        Arc::new(HttpMapsClient::from_config(&config.maps).context("failed to build maps client")?)
    } else {
        Arc::new(DisabledMapsClient)
    };

    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        Arc::new(MemoryObjectStore::new()),
        maps,
        Arc::new(TokenAuthority::from_config(&config.auth)),
    );

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit.refill_rate,
        config.rate_limit.burst,
        config.rate_limit.idle_eviction(),
    ));

    let app = build_router(state, rate_limiter);

    let addr: SocketAddr = format!("{}:{}", config.server.bind_address, config.server.bind_port)
        .parse()
        .context("invalid bind address")?;

    tracing::info!(%addr, environment = %config.environment, "courier server listening");

    let listener = tokio::net::TcpListener::bind(addr).await.context("failed to bind listener")?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("courier server stopped");
    Ok(())
}
