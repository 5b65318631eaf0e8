use crate::domain::Metrics;
use std::time::Instant;

/// No-op metrics implementation.
pub struct NoopMetrics;

impl Metrics for NoopMetrics {
    // ---
    fn render(&self) -> String {
        String::new()
    }
    fn record_attendance_submitted(&self, _: bool) {}
    fn record_timetable_assigned(&self) {}
    fn record_http_request(&self, _: Instant, _: &str, _: &str, _: u16) {}
}
