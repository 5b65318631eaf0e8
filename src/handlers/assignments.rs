use super::error::AppResult;
use super::extract::{AuthUser, JsonBody, RequireAdmin};
use crate::app_state::AppState;
use crate::domain::assignment::{self, Assignment, AssignmentOverview, ResolvedAssignment};
use crate::domain::{RecordId, StudentRef};
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(alias = "studentInternalId")]
    student_id: RecordId,
    #[serde(alias = "timetableInternalId")]
    timetable_id: RecordId,
}

#[derive(Debug, Serialize)]
pub struct AssignResponse {
    message: &'static str,
    assignment: Assignment,
}

/// `GET /api/assignment/{studentToken}`
///
/// The token is either an internal id or a student ID string.
#[tracing::instrument(skip(state, user), fields(caller = %user.user_id))]
pub async fn get_assignment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(token): Path<String>,
) -> AppResult<Json<ResolvedAssignment>> {
    // ---
    let repo = state.repository().as_ref();
    let student_id = assignment::resolve_student(repo, &StudentRef::classify(&token)).await?;
    user.ensure_self_or_admin(&student_id)?;

    let resolved = assignment::find_assignment(repo, &student_id).await?;
    Ok(Json(resolved))
}

/// `POST /api/assignment`
#[tracing::instrument(skip_all, fields(admin = %admin.0.user_id))]
pub async fn assign_timetable(
    State(state): State<AppState>,
    admin: RequireAdmin,
    JsonBody(request): JsonBody<AssignRequest>,
) -> AppResult<Json<AssignResponse>> {
    // ---
    let assignment = assignment::assign_timetable(
        state.repository().as_ref(),
        &request.student_id,
        &request.timetable_id,
    )
    .await?;
    state.metrics().record_timetable_assigned();

    Ok(Json(AssignResponse {
        message: "Timetable assigned successfully",
        assignment,
    }))
}

/// `GET /api/assignments`
pub async fn list_assignments(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> AppResult<Json<Vec<AssignmentOverview>>> {
    // ---
    let overview = assignment::list_assignments(state.repository().as_ref()).await?;
    Ok(Json(overview))
}
