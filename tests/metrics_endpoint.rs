use axum::body::Body;
use axum::http::{Request, StatusCode};
use student_portal::MetricsKind;

mod common;
use common::TestApp;

// NOTE: Prometheus metrics use a process-wide recorder.
// Assertions only look for series this file produces.

#[tokio::test]
async fn metrics_endpoint_with_prometheus() {
    // ---
    let app = TestApp::with_metrics(MetricsKind::Prometheus).await;

    let _ = app.get("/health", None).await;
    let (_, token) = app.register("IT060").await;
    let _ = app.get("/api/user/profile", Some(&token)).await;

    let request = Request::get("/metrics").body(Body::empty()).unwrap();
    let (status, body) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::OK);

    assert!(body.contains("http_requests_total"), "{body}");
    assert!(body.contains(r#"path="/api/user/profile""#), "{body}");
}

#[tokio::test]
async fn metrics_count_attendance_and_assignments() {
    // ---
    let app = TestApp::with_metrics(MetricsKind::Prometheus).await;
    let admin = app.admin_token().await;
    let (student, token) = app.register("IT061").await;

    let body = serde_json::json!({
        "studentId": student,
        "date": "2024-01-01",
        "records": [{ "subject": "Math", "status": "present", "time": "09:00 - 10:00" }]
    });
    let (status, _) = app.post("/api/attendance/submit", Some(&token), body).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, timetable) = app
        .post(
            "/api/timetable",
            Some(&admin),
            serde_json::json!({ "year": "1", "semester": "1st", "days": [] }),
        )
        .await;
    let (status, _) = app
        .post(
            "/api/assignment",
            Some(&admin),
            serde_json::json!({ "studentId": student, "timetableId": timetable["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::get("/metrics").body(Body::empty()).unwrap();
    let (_, text) = app.send_raw(request).await;
    assert!(text.contains("attendance_submissions_total"), "{text}");
    assert!(text.contains("timetable_assignments_total"), "{text}");
}

#[tokio::test]
async fn metrics_endpoint_with_noop() {
    // ---
    let app = TestApp::new().await;
    let _ = app.get("/health", None).await;

    let request = Request::get("/metrics").body(Body::empty()).unwrap();
    let (status, body) = app.send_raw(request).await;
    assert_eq!(status, StatusCode::OK, "Metrics endpoint should return success even with noop");
    assert!(body.is_empty());
}

#[tokio::test]
async fn metrics_endpoint_survives_load() {
    // ---
    let app = TestApp::with_metrics(MetricsKind::Prometheus).await;

    let requests = (0..20).map(|i| {
        let endpoint = match i % 3 {
            0 => "/health",
            1 => "/api/timetables",
            _ => "/metrics",
        };
        app.get(endpoint, None)
    });
    let responses = futures::future::join_all(requests).await;

    for (i, (status, _)) in responses.into_iter().enumerate() {
        assert!(
            status.is_success() || status == StatusCode::UNAUTHORIZED,
            "Request {i} returned {status}"
        );
    }
}

#[tokio::test]
async fn metrics_content_type_is_correct() {
    // ---
    let app = TestApp::with_metrics(MetricsKind::Prometheus).await;

    let request = Request::get("/metrics").body(Body::empty()).unwrap();
    let response = app.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("text/plain"), "{content_type}");
}
