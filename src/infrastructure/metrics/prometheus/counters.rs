use metrics::{counter, histogram};
use std::time::Instant;

/// Count attendance submissions, split by whether the day was new.
pub fn increment_attendance_submitted(created: bool) {
    let outcome = if created { "created" } else { "replaced" };
    counter!("attendance_submissions_total", "outcome" => outcome).increment(1);
}

pub fn increment_timetable_assigned() {
    counter!("timetable_assignments_total").increment(1);
}

/// Track HTTP request latency and count, labelled by route and status.
pub fn track_http_request(start: Instant, path: &str, method: &str, status: u16) {
    // ---
    let labels = [
        ("path", path.to_string()),
        ("method", method.to_string()),
        ("status", status.to_string()),
    ];
    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(start.elapsed());
}
