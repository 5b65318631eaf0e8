use anyhow::{Context, Result};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::OnceCell;

static HANDLE: OnceCell<PrometheusHandle> = OnceCell::new();

/// Install the global Prometheus recorder once and keep its handle.
///
/// Later calls reuse the installed recorder, so several routers (as in the
/// integration tests) can share one process. Concurrent first calls block
/// until the single install finishes.
pub fn init_metrics() -> Result<()> {
    // ---
    HANDLE.get_or_try_init(|| {
        PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")
    })?;
    Ok(())
}

/// Render the current metrics in Prometheus text format.
pub fn render_metrics() -> String {
    HANDLE.get().map(PrometheusHandle::render).unwrap_or_default()
}
