mod noop_metrics;

pub use noop_metrics::NoopMetrics;
use std::sync::Arc;

/// Creates a metrics backend that discards everything.
///
/// Used by tests and whenever `PORTAL_METRICS_TYPE` is not `prom`.
pub fn create() -> anyhow::Result<crate::domain::MetricsPtr> {
    Ok(Arc::new(NoopMetrics))
}
