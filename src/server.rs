//! HTTP server initialization and runtime setup.
//!
//! Handles the database connection, service wiring, and Axum server lifecycle.

use crate::application::services::{AuthService, LinkService, RedirectService};
use crate::config::Config;
use crate::domain::reserved_codes::ReservedCodes;
use crate::infrastructure::persistence::{self, SqliteLinkRepository};
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::Result;
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::NormalizePathLayer;

/// Wires repositories and services over an open pool.
///
/// The reserved set (the router's own top-level segments plus
/// `RESERVED_CODES`) is shared by the registry and the resolver.
pub fn build_state(pool: SqlitePool, config: &Config) -> AppState {
    let link_repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool)));

    let reserved = ReservedCodes::from_routes(&config.reserved_codes);

    let link_service = Arc::new(
        LinkService::new(link_repository.clone(), config.code_allocation())
            .with_reserved_codes(reserved.clone()),
    );
    let redirect_service = Arc::new(RedirectService::new(link_repository, reserved));
    let auth_service = Arc::new(AuthService::new(&config.api_key));

    AppState::new(
        link_service,
        redirect_service,
        auth_service,
        &config.public_base_url,
    )
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - SQLite connection pool
/// - Apply migrations
/// - Link registry, redirect resolver, and API key check
/// - Axum HTTP server
///
/// # Errors
///
/// Returns an error if:
/// - Database connection or migration fails
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let pool = persistence::connect(
        &config.database_url,
        config.db_max_connections,
        config.connect_timeout(),
    )
    .await?;
    tracing::info!("Connected to database");

    let state = build_state(pool.clone(), &config);

    let router = app_router(state, &config.cors_allowed_origins);
    let app = NormalizePathLayer::trim_trailing_slash().layer(router);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Resolves on Ctrl-C or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
