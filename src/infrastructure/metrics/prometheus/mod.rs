mod counters;
mod prometheus_metrics;
mod recorder;

pub use prometheus_metrics::PrometheusMetrics;
use std::sync::Arc;

pub(crate) use counters::{
    increment_attendance_submitted, increment_timetable_assigned, track_http_request,
};
pub(crate) use recorder::{init_metrics, render_metrics};

/// Creates the Prometheus-backed metrics implementation.
///
/// Installs the global recorder on first use; the `/metrics` route renders it.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    // ---
    tracing::info!("Initializing Prometheus metrics");
    init_metrics()?;

    Ok(Arc::new(PrometheusMetrics))
}
