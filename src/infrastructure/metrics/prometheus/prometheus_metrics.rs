//! Prometheus metrics implementation.
//!
//! Delegates to the sibling `counters` and `recorder` modules, which talk to
//! the global `metrics` registry. The struct itself carries no state.

use crate::domain::Metrics;
use std::time::Instant;

pub struct PrometheusMetrics;

impl Metrics for PrometheusMetrics {
    // ---
    fn render(&self) -> String {
        super::render_metrics()
    }

    fn record_attendance_submitted(&self, created: bool) {
        tracing::debug!(created, "Recording attendance submission");
        super::increment_attendance_submitted(created);
    }

    fn record_timetable_assigned(&self) {
        super::increment_timetable_assigned();
    }

    fn record_http_request(&self, start: Instant, path: &str, method: &str, status: u16) {
        super::track_http_request(start, path, method, status);
    }
}
