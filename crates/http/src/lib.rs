//! HTTP server facade for the bookstore service: Axum, error handling, and OpenAPI.

use anyhow::Context;
use axum::{routing::get, Router};
use sqlx::SqlitePool;

use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};

pub mod error;
pub mod router;

pub use error::AppError;
use router::RouterBuilder;

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(
    registry: &ModuleRegistry,
    settings: &Settings,
    db: &SqlitePool,
) -> anyhow::Result<()> {
    let ctx = InitCtx { settings, db };
    let app = build_router(registry, &ctx);

    let address = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

/// Build the main HTTP router with all module routes mounted
pub fn build_router(registry: &ModuleRegistry, ctx: &InitCtx<'_>) -> Router {
    let route_prefix = ctx.settings.server.route_prefix.as_str();

    let mut router_builder = RouterBuilder::new()
        .with_tracing()
        .with_cors()
        .with_request_id()
        .with_timeout(ctx.settings.server.request_timeout_ms)
        .route("/healthz", get(health_check));

    for module in registry.modules() {
        let path = router::module_path(route_prefix, module.name());
        tracing::info!(module = module.name(), "mounting module routes under {}", path);
        router_builder = router_builder.mount_module(&path, module.routes(ctx));
    }

    router_builder.with_openapi(registry, route_prefix).build()
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(e) => {
            tracing::error!(error = %e, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
