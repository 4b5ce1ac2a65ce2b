//! API Gateway Library
//!
//! This crate provides the HTTP JSON API over the social service.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tracing::info;

use social_service_lib::build_service;
use social_service_lib::config::SocialServiceConfig;
use social_service_lib::infra::Database;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Open the database, serve the API and close the pool after shutdown.
pub async fn run(config: GatewayConfig) -> Result<(), Box<dyn std::error::Error>> {
    let service_config = SocialServiceConfig::from_env();
    let db = Database::connect(&service_config.database).await?;

    let service = build_service(db.get_connection());
    let state = AppState::new(service, Some(db.clone()), config.clone());
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("HTTP server stopped");
    db.close().await?;

    Ok(())
}

/// Resolve on Ctrl+C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
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

    info!("Received shutdown signal, draining connections...");
}
