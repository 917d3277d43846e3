//! # Prometheus Metrics
//!
//! Counters recorded through the `metrics` facade and exported by
//! `metrics-exporter-prometheus` at `/metrics`.
//!
//! | Metric                              | Labels           |
//! |-------------------------------------|------------------|
//! | `ubo_http_requests_total`           | `path`, `status` |
//! | `ubo_http_request_duration_seconds` | `path`           |
//! | `ubo_map_renders_total`             | `category`       |
//! | `ubo_render_failures_total`         |                  |
//!
//! Without an installed recorder every macro is a no-op, so handlers record
//! unconditionally.

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Label used for requests that matched no route (they render the home page).
const UNMATCHED_PATH: &str = "unmatched";

/// Install the global Prometheus recorder and return its scrape handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Count one successful category render.
pub fn record_render(category: &str) {
    metrics::counter!("ubo_map_renders_total", "category" => category.to_string()).increment(1);
}

/// Count one render refused because of a data-integrity fault.
pub fn record_render_failure() {
    metrics::counter!("ubo_render_failures_total").increment(1);
}

/// Middleware that records HTTP request metrics.
///
/// The path label is the matched route template, so `/v1/map/3` and
/// `/v1/map/4` share one series.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_PATH.to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!("ubo_http_requests_total", "path" => path.clone(), "status" => status)
        .increment(1);
    metrics::histogram!("ubo_http_request_duration_seconds", "path" => path)
        .record(start.elapsed().as_secs_f64());

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    fn counted_router() -> Router {
        Router::new()
            .route("/v1/map/{index}", get(|| async { "figure" }))
            .fallback(|| async { (StatusCode::OK, "home") })
            .layer(from_fn(metrics_middleware))
    }

    async fn send(router: Router, uri: &str) -> StatusCode {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn requests_are_counted_by_route_template() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        // The default test runtime is single-threaded, so the thread-local
        // recorder sees every request.
        let _guard = metrics::set_default_local_recorder(&recorder);

        assert_eq!(send(counted_router(), "/v1/map/3").await, StatusCode::OK);
        assert_eq!(send(counted_router(), "/v1/map/4").await, StatusCode::OK);
        assert_eq!(send(counted_router(), "/nowhere").await, StatusCode::OK);

        let text = handle.render();
        let series: Vec<&str> = text
            .lines()
            .filter(|l| l.starts_with("ubo_http_requests_total{"))
            .collect();
        assert_eq!(series.len(), 2, "{text}");
        let templated = series
            .iter()
            .find(|l| l.contains(r#"path="/v1/map/{index}""#))
            .unwrap();
        assert!(templated.contains(r#"status="200""#));
        assert!(templated.ends_with(" 2"));
        let unmatched = series
            .iter()
            .find(|l| l.contains(r#"path="unmatched""#))
            .unwrap();
        assert!(unmatched.ends_with(" 1"));
        assert!(text.contains("ubo_http_request_duration_seconds"));
    }

    #[test]
    fn render_counters_are_labelled_by_category() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_render("Paywall");
            record_render("Paywall");
            record_render("Structured data");
            record_render_failure();
        });
        let text = handle.render();
        assert!(text.contains(r#"ubo_map_renders_total{category="Paywall"} 2"#), "{text}");
        assert!(text.contains(r#"ubo_map_renders_total{category="Structured data"} 1"#));
        assert!(text.contains("ubo_render_failures_total 1"));
    }
}
