use super::error::AppResult;
use super::extract::{record_id, AuthUser, JsonBody, QueryParams};
use crate::app_state::AppState;
use crate::domain::analytics::{self, AttendanceAnalytics};
use crate::domain::attendance::{
    self, deserialize_calendar_date, deserialize_optional_calendar_date, AttendanceMark,
    AttendanceRecord, DateRange, Upserted,
};
use crate::domain::RecordId;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSubmission {
    /// Defaults to the caller; admins may submit for another student.
    #[serde(default)]
    student_id: Option<RecordId>,
    #[serde(deserialize_with = "deserialize_calendar_date")]
    date: NaiveDate,
    #[serde(default)]
    records: Vec<AttendanceMark>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryQuery {
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_calendar_date")]
    end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct SubmissionResponse {
    message: &'static str,
    attendance: AttendanceRecord,
}

/// `POST /api/attendance/submit`
///
/// 201 when the day is new, 200 when it replaced earlier marks.
#[tracing::instrument(skip_all, fields(date = %submission.date))]
pub async fn submit_attendance(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(submission): JsonBody<AttendanceSubmission>,
) -> AppResult<(StatusCode, Json<SubmissionResponse>)> {
    // ---
    let student_id = submission.student_id.unwrap_or_else(|| user.user_id.clone());
    user.ensure_self_or_admin(&student_id)?;

    let outcome = attendance::submit_attendance(
        state.repository().as_ref(),
        &student_id,
        submission.date,
        submission.records,
    )
    .await?;
    state.metrics().record_attendance_submitted(outcome.is_created());

    let (status, message, record) = match outcome {
        Upserted::Created(record) => (StatusCode::CREATED, "Attendance submitted successfully", record),
        Upserted::Replaced(record) => (StatusCode::OK, "Attendance updated successfully", record),
    };

    Ok((
        status,
        Json(SubmissionResponse {
            message,
            attendance: record,
        }),
    ))
}

/// `GET /api/attendance/student/{studentId}?startDate=&endDate=`
pub async fn attendance_history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(student_id): Path<String>,
    QueryParams(query): QueryParams<HistoryQuery>,
) -> AppResult<Json<Vec<AttendanceRecord>>> {
    // ---
    let student_id = record_id(&student_id)?;
    user.ensure_self_or_admin(&student_id)?;

    let range = DateRange::from_bounds(query.start_date, query.end_date);
    let records = attendance::attendance_history(state.repository().as_ref(), &student_id, range).await?;
    Ok(Json(records))
}

/// `GET /api/attendance/analytics/{studentId}`
#[tracing::instrument(skip(state, user))]
pub async fn attendance_analytics(
    State(state): State<AppState>,
    user: AuthUser,
    Path(student_id): Path<String>,
) -> AppResult<Json<AttendanceAnalytics>> {
    // ---
    let student_id = record_id(&student_id)?;
    user.ensure_self_or_admin(&student_id)?;

    let records = attendance::attendance_history(state.repository().as_ref(), &student_id, None).await?;
    Ok(Json(analytics::analyze(&records)))
}
