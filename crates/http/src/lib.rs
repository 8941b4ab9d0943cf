//! HTTP server facade for the bookstore service: Axum router assembly,
//! error rendering, and probes.

use std::sync::Arc;

use anyhow::Context;
use axum::{extract::State, routing::get, Router};

use bookstore_kernel::{settings::Settings, ModuleRegistry};

pub mod error;
pub mod router;

use error::AppError;
use router::RouterBuilder;

/// Start the HTTP server and serve until ctrl-c
pub async fn start_server(registry: Arc<ModuleRegistry>, settings: &Settings) -> anyhow::Result<()> {
    let app = build_router(registry, settings);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the application router with every module merged at the root
pub fn build_router(registry: Arc<ModuleRegistry>, settings: &Settings) -> Router {
    let mut builder = RouterBuilder::new()
        .route("/healthz", get(health_check))
        .route("/readyz", get(readiness_check).with_state(registry.clone()));

    for module in registry.modules() {
        builder = builder.mount_module(module.name(), module.routes());
    }

    builder
        .with_openapi(&registry)
        .with_timeout(settings.server.request_timeout_ms)
        .with_tracing()
        .with_request_id()
        .build()
}

async fn health_check() -> &'static str {
    "ok"
}

async fn readiness_check(
    State(registry): State<Arc<ModuleRegistry>>,
) -> Result<&'static str, AppError> {
    registry.check_ready().await.map_err(|err| {
        tracing::warn!(error = %format!("{err:#}"), "readiness check failed");
        AppError::unavailable(format!("{err:#}"))
    })?;
    Ok("ready")
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(%err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
