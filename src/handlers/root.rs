use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Student Portal API
Version: {version}

Available endpoints:
  - /api/user             - Registration, login and profile
  - /api/timetable(s)     - Weekly class timetables
  - /api/assignment(s)    - Timetable assignment per student
  - /api/attendance       - Attendance submission, history and analytics
  - /api/ongoing-tasks    - Ongoing task board
  - /api/tasks            - Task corner
  - GET /health           - Light health check
  - GET /health?mode=full - Full health check (store and sessions)
  - GET /metrics          - Prometheus metrics
"#
    )
}
