// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use member_service::{
    api::router,
    auth::{JwksKeyCache, TokenAuthenticator},
    config::{Config, LogFormat, DEFAULT_LOG_FILTER},
    state::AppState,
    storage::MemberDatabase,
};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    init_tracing(config.log_format);

    info!(
        bind_address = %config.bind_address,
        issuer_uri = %config.issuer_uri,
        member_db_path = %config.member_db_path.display(),
        "Starting member service"
    );

    let members = MemberDatabase::open(&config.member_db_path).map_err(|e| {
        error!("Failed to open member database: {}", e);
        e
    })?;

    let keys = Arc::new(JwksKeyCache::for_issuer(
        &config.issuer_uri,
        config.jwks_fetch_timeout,
    ));
    info!(jwks_url = %keys.jwks_url(), "Signing keys are fetched on first use");

    let authenticator =
        Arc::new(TokenAuthenticator::new(keys).with_leeway(config.jwt_clock_skew_seconds));
    let state = AppState::new(members, authenticator, config.issuer_uri.clone());
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| {
            error!("Failed to bind {}: {}", config.bind_address, e);
            e
        })?;

    info!(
        "Member service listening on http://{} (docs at /swagger-ui)",
        config.bind_address
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Member service shutdown complete");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
