//! # ubo-api — UBO Atlas Web Service
//!
//! Serves the atlas over HTTP on Axum/Tower/Tokio. The [`ubo_core::Atlas`]
//! is loaded once by [`bootstrap`] and shared read-only by every handler.
//!
//! ## Surface
//!
//! | Path                     | Module                    | Purpose                    |
//! |--------------------------|---------------------------|----------------------------|
//! | `/`, `/about`, fallback  | [`routes::pages`]         | Server-rendered pages      |
//! | `/v1/categories/*`       | [`routes::categories`]    | Registry and legends       |
//! | `/v1/map/*`              | [`routes::map`]           | Choropleth figures         |
//! | `/v1/home/update`        | [`routes::map`]           | Accordion click handling   |
//! | `/static/*`              | `tower_http::services`    | Dataset downloads, assets  |
//! | `/openapi.json`          | [`openapi`]               | OpenAPI document           |
//! | `/health/*`, `/metrics`  | this module               | Probes and Prometheus      |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → Handler
//! ```
//!
//! ## Crate Policy
//!
//! - No rendering logic in handlers; they delegate to `ubo-core`.
//! - All errors map to structured JSON responses via [`AppError`].

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod pages;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use state::{AppConfig, AppState};

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Assemble the full application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(routes::pages::router())
        .merge(routes::categories::router())
        .merge(routes::map::router())
        .merge(openapi::router())
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness))
        .fallback(routes::pages::page);

    if state.metrics.is_some() {
        router = router
            .route("/metrics", get(prometheus_metrics))
            .layer(from_fn(middleware::metrics::metrics_middleware));
    }

    router.layer(TraceLayer::new_for_http()).with_state(state)
}

/// GET /health/liveness — the process is up.
async fn liveness() -> &'static str {
    "ok"
}

/// GET /health/readiness — the atlas is loaded and has categories to show.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.atlas.registry().is_empty() || state.atlas.dataset().countries().is_empty() {
        return (StatusCode::SERVICE_UNAVAILABLE, "atlas empty");
    }
    (StatusCode::OK, "ready")
}

/// GET /metrics — Prometheus text exposition.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}
