use axum::http::StatusCode;
use serde_json::{json, Value};

mod common;
use common::TestApp;

fn week() -> Value {
    // ---
    json!({
        "year": "2",
        "semester": "1st",
        "days": [
            {
                "day": "Wednesday",
                "slots": [
                    { "subject": "Math", "location": "A1", "startTime": "9:00", "endTime": "10:00", "type": "Lab" },
                    { "subject": "Physics", "location": "B2", "startTime": "10:00", "endTime": "11:30" }
                ]
            },
            { "day": "Monday", "slots": [] }
        ]
    })
}

// ============================================================================
// Timetables
// ============================================================================

#[tokio::test]
async fn timetable_round_trips_with_order_preserved() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (_, student) = app.register("IT010").await;

    let (status, _) = app.post("/api/timetable", Some(&student), week()).await;
    assert_eq!(status, StatusCode::FORBIDDEN, "students cannot save timetables");

    let (status, saved) = app.post("/api/timetable", Some(&admin), week()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, loaded) = app
        .get("/api/timetable?year=2&semester=1st", Some(&student))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loaded, saved);
    assert_eq!(loaded["days"][0]["day"], "Wednesday");
    assert_eq!(loaded["days"][0]["slots"][1]["subject"], "Physics");
    assert!(loaded["days"][0]["slots"][1].get("type").is_none(), "absent type stays absent");

    let id = saved["id"].as_str().unwrap();
    let (status, by_id) = app.get(&format!("/api/timetable/{id}"), Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_id, saved);

    let (status, list) = app.get("/api/timetables", Some(&student)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([{ "id": id, "year": "2", "semester": "1st" }]));
}

#[tokio::test]
async fn saving_again_replaces_days_and_keeps_id() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (_, first) = app.post("/api/timetable", Some(&admin), week()).await;
    let (status, second) = app
        .post(
            "/api/timetable",
            Some(&admin),
            json!({ "year": "2", "semester": "1st", "days": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["id"], first["id"]);
    assert_eq!(second["days"], json!([]));
}

#[tokio::test]
async fn timetable_lookups_fail_cleanly() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app
        .get("/api/timetable?year=9&semester=1st", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "timetable not found");

    let (status, _) = app.get("/api/timetable?year=9", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "semester is required");

    let (status, _) = app.get("/api/timetable/not-an-id", Some(&admin)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut bad = week();
    bad["days"][0]["slots"][0]["startTime"] = json!("nine");
    let (status, _) = app.post("/api/timetable", Some(&admin), bad).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ============================================================================
// Assignments
// ============================================================================

#[tokio::test]
async fn assignment_resolves_by_student_id_and_internal_id() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (student, token) = app.register("IT020").await;
    let (_, first) = app.post("/api/timetable", Some(&admin), week()).await;
    let (_, second) = app
        .post(
            "/api/timetable",
            Some(&admin),
            json!({ "year": "2", "semester": "2nd", "days": [] }),
        )
        .await;

    let (status, _) = app.get("/api/assignment/IT020", Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND, "nothing assigned yet");

    let (status, body) = app
        .post(
            "/api/assignment",
            Some(&admin),
            json!({ "studentId": student, "timetableId": first["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Timetable assigned successfully");
    let assignment_id = body["assignment"]["id"].clone();

    let (status, body) = app
        .post(
            "/api/assignment",
            Some(&admin),
            json!({ "studentInternalId": student, "timetableInternalId": second["id"] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assignment"]["id"], assignment_id, "reassignment keeps the id");

    let (status, by_student_id) = app.get("/api/assignment/IT020", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_student_id["timetable"]["semester"], "2nd");

    let (status, by_internal) = app
        .get(&format!("/api/assignment/{student}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_internal, by_student_id);

    let (status, overview) = app.get("/api/assignments", Some(&admin)).await;
    assert_eq!(status, StatusCode::OK);
    let rows = overview.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["student"]["studentId"], "IT020");
}

#[tokio::test]
async fn assignment_errors_distinguish_missing_user_and_assignment() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;

    let (status, body) = app.get("/api/assignment/NOBODY", Some(&admin)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "user not found");

    let (status, body) = app
        .get("/api/assignment/0123456789abcdef01234567", Some(&admin))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "assignment not found");

    let (student, _) = app.register("IT021").await;
    let (status, _) = app
        .post(
            "/api/assignment",
            Some(&admin),
            json!({ "studentId": student, "timetableId": "0123456789abcdef01234567" }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn students_cannot_read_each_others_assignment() {
    // ---
    let app = TestApp::new().await;
    app.register("IT022").await;
    let (_, other) = app.register("IT023").await;

    let (status, _) = app.get("/api/assignment/IT022", Some(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app.get("/api/assignments", Some(&other)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ============================================================================
// Attendance
// ============================================================================

fn math_day(date: &str, status: &str) -> Value {
    json!({
        "date": date,
        "records": [{ "subject": "Math", "status": status, "time": "09:00 - 10:00" }]
    })
}

#[tokio::test]
async fn submitting_a_day_twice_replaces_it() {
    // ---
    let app = TestApp::new().await;
    let (student, token) = app.register("IT030").await;

    let mut body = math_day("2024-01-01", "present");
    body["studentId"] = json!(student);

    let (status, created) = app.post("/api/attendance/submit", Some(&token), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "Attendance submitted successfully");
    assert_eq!(created["attendance"]["records"][0]["type"], "Lecture");

    body["records"] = json!([
        { "subject": "Chemistry", "status": "absent", "time": "11:00 - 12:00", "type": "Tutorial" }
    ]);
    let (status, replaced) = app.post("/api/attendance/submit", Some(&token), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["attendance"]["id"], created["attendance"]["id"]);

    let (status, history) = app
        .get(&format!("/api/attendance/student/{student}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    let days = history.as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["records"][0]["subject"], "Chemistry");
}

#[tokio::test]
async fn submission_without_student_id_records_the_caller() {
    // ---
    let app = TestApp::new().await;
    let (student, token) = app.register("IT035").await;

    let body = math_day("2024-01-01T00:00:00.000Z", "present");
    let (status, created) = app.post("/api/attendance/submit", Some(&token), body.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["attendance"]["studentId"], student);
    assert_eq!(created["attendance"]["date"], "2024-01-01");

    let (status, replaced) = app.post("/api/attendance/submit", Some(&token), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(replaced["attendance"]["id"], created["attendance"]["id"]);
}

#[tokio::test]
async fn history_range_and_analytics_end_to_end() {
    // ---
    let app = TestApp::new().await;
    let (student, token) = app.register("IT031").await;

    for (date, status) in [("2024-01-01", "present"), ("2024-01-02", "absent")] {
        let mut body = math_day(date, status);
        body["studentId"] = json!(student);
        let (code, _) = app.post("/api/attendance/submit", Some(&token), body).await;
        assert_eq!(code, StatusCode::CREATED);
    }

    let (_, all) = app
        .get(&format!("/api/attendance/student/{student}"), Some(&token))
        .await;
    assert_eq!(all[0]["date"], "2024-01-02", "newest first");

    let (_, narrowed) = app
        .get(
            &format!("/api/attendance/student/{student}?startDate=2024-01-01&endDate=2024-01-01"),
            Some(&token),
        )
        .await;
    assert_eq!(narrowed.as_array().unwrap().len(), 1);

    let (status, analytics) = app
        .get(&format!("/api/attendance/analytics/{student}"), Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["totalClasses"], 2);
    assert_eq!(analytics["presentCount"], 1);
    assert_eq!(analytics["absentCount"], 1);
    assert_eq!(analytics["attendanceRate"], 50.0);
    assert_eq!(analytics["totalHours"], 1.0);
    assert_eq!(analytics["subjectWise"], json!({ "Math": { "present": 1, "absent": 1 } }));
    assert_eq!(analytics["typeWise"]["Lecture"], json!({ "present": 1, "absent": 1 }));
}

#[tokio::test]
async fn attendance_is_private_to_the_student_and_admins() {
    // ---
    let app = TestApp::new().await;
    let admin = app.admin_token().await;
    let (student, token) = app.register("IT032").await;
    let (_, other) = app.register("IT033").await;

    let mut body = math_day("2024-02-01", "present");
    body["studentId"] = json!(student);

    let (status, _) = app.post("/api/attendance/submit", Some(&other), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.post("/api/attendance/submit", Some(&admin), body).await;
    assert_eq!(status, StatusCode::CREATED, "admins submit for anyone");

    let analytics = format!("/api/attendance/analytics/{student}");
    assert_eq!(app.get(&analytics, Some(&other)).await.0, StatusCode::FORBIDDEN);
    assert_eq!(app.get(&analytics, Some(&token)).await.0, StatusCode::OK);
    assert_eq!(app.get(&analytics, Some(&admin)).await.0, StatusCode::OK);

    let (status, _) = app.get("/api/attendance/analytics/IT032", Some(&token)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "internal id required");
}

#[tokio::test]
async fn unknown_session_type_is_refused() {
    // ---
    let app = TestApp::new().await;
    let (student, token) = app.register("IT034").await;

    let body = json!({
        "studentId": student,
        "date": "2024-03-01",
        "records": [{ "subject": "Math", "status": "present", "time": "09:00 - 10:00", "type": "Seminar" }]
    });
    let (status, _) = app.post("/api/attendance/submit", Some(&token), body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
