//! Prometheus scrape endpoint and per-request HTTP metrics

pub mod handlers;
pub mod middleware;

pub use handlers::{describe_metrics, prometheus_metrics, MetricsState, NEARBY_SKIPPED_TOTAL};
pub use middleware::http_metrics_middleware;
