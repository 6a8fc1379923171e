//! Observability utilities for the todo service.
//!
//! This crate provides:
//! - Prometheus metrics recording and export
//! - Todo operation metrics shared by the REST and gRPC front-ends
//! - Axum middleware for automatic request metrics
//!
//! # Example
//!
//! ```rust,ignore
//! use observability::{init_metrics, metrics_handler, TodoMetrics};
//!
//! // Initialize metrics recorder
//! init_metrics()?;
//!
//! // Time a service operation
//! let timer = TodoMetrics::start("create");
//! timer.finish("ok");
//!
//! // Add metrics endpoint to router
//! let app = Router::new()
//!     .route("/metrics", get(metrics_handler));
//! ```

pub mod middleware;
pub mod todos;

pub use middleware::metrics_middleware;
pub use todos::{OperationTimer, TodoMetrics};

// Re-export metrics macros for convenience
pub use metrics::{counter, gauge, histogram};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;
use tracing::info;

static METRICS_HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Initialize the Prometheus metrics recorder.
///
/// Call once at application startup; later calls return the same handle.
/// Fails if another global recorder was installed first.
pub fn init_metrics() -> Result<&'static PrometheusHandle, BuildError> {
    METRICS_HANDLE.get_or_try_init(|| {
        let handle = PrometheusBuilder::new().install_recorder()?;

        info!("Prometheus metrics recorder initialized");

        register_metric_descriptions();

        Ok(handle)
    })
}

/// Get the metrics handle (must call init_metrics first)
pub fn get_metrics_handle() -> Option<&'static PrometheusHandle> {
    METRICS_HANDLE.get()
}

/// Axum handler for /metrics endpoint
pub async fn metrics_handler() -> String {
    match get_metrics_handle() {
        Some(handle) => handle.render(),
        None => "# Metrics not initialized\n".to_string(),
    }
}

fn register_metric_descriptions() {
    use metrics::{describe_counter, describe_gauge, describe_histogram};

    // HTTP metrics
    describe_counter!("http_requests_total", "Total number of HTTP requests");
    describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    describe_counter!(
        "http_errors_total",
        "Total number of HTTP responses with a 4xx or 5xx status"
    );

    // Todo metrics
    describe_counter!(
        todos::OPERATIONS_TOTAL,
        "Todo service operations by operation and outcome"
    );
    describe_histogram!(
        todos::OPERATION_DURATION_SECONDS,
        "Todo service operation duration in seconds"
    );
    describe_gauge!(todos::TODOS_TOTAL, "Todos by completion state, as of the last stats call");
}
