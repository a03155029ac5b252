//! HTTP front end for the prediction service.
//!
//! Routes:
//! - `POST /predict` takes `{"symptoms": "..."}` and returns a
//!   [`PredictionResult`](crate::PredictionResult)
//! - `GET /health` reports version and loaded model shape
//!
//! Inference is CPU-bound and runs on the blocking thread pool so that a
//! slow model never stalls the async workers.

pub mod error;
pub mod routes;

pub use error::ApiError;

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::service::PredictionService;
use crate::{EirError, Result};

/// Build the router with all routes and middleware.
pub fn build_router(service: PredictionService, config: &ServerConfig) -> Router {
    let limits = &config.limits;

    let cors = if config.cors {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        CorsLayer::new()
    };

    Router::new()
        .route("/predict", post(routes::predict))
        .route("/health", get(routes::health))
        .fallback(routes::not_found)
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(limits.request_timeout_secs),
        ))
        .layer(ConcurrencyLimitLayer::new(limits.max_concurrent_requests))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Bind to the configured address and serve until Ctrl+C or SIGTERM.
pub async fn serve(service: PredictionService, config: &ServerConfig) -> Result<()> {
    let addr: SocketAddr = config.address.parse().map_err(|e| {
        EirError::Configuration(format!("invalid server address {:?}: {e}", config.address))
    })?;

    let app = build_router(service, config);
    let listener = TcpListener::bind(addr).await?;

    info!(
        %addr,
        cors = config.cors,
        timeout_secs = config.limits.request_timeout_secs,
        max_body_bytes = config.limits.max_body_bytes,
        max_concurrent = config.limits.max_concurrent_requests,
        "eird listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }
}
