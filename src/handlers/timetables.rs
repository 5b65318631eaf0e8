use super::error::AppResult;
use super::extract::{record_id, AuthUser, JsonBody, QueryParams, RequireAdmin};
use crate::app_state::AppState;
use crate::domain::timetable::{self, Timetable, TimetableDraft, TimetableSummary};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TimetableQuery {
    year: String,
    semester: String,
}

/// `GET /api/timetable?year=&semester=`
pub async fn get_timetable(
    State(state): State<AppState>,
    _user: AuthUser,
    QueryParams(query): QueryParams<TimetableQuery>,
) -> AppResult<Json<Timetable>> {
    // ---
    let found = timetable::timetable_for(state.repository().as_ref(), &query.year, &query.semester).await?;
    Ok(Json(found))
}

/// `POST /api/timetable`
#[tracing::instrument(skip_all, fields(admin = %admin.0.user_id))]
pub async fn save_timetable(
    State(state): State<AppState>,
    admin: RequireAdmin,
    JsonBody(draft): JsonBody<TimetableDraft>,
) -> AppResult<Json<Timetable>> {
    // ---
    let saved = timetable::save_timetable(state.repository().as_ref(), draft).await?;
    Ok(Json(saved))
}

/// `GET /api/timetable/{id}`
pub async fn get_timetable_by_id(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<Timetable>> {
    // ---
    let id = record_id(&id)?;
    let found = timetable::timetable_by_id(state.repository().as_ref(), &id).await?;
    Ok(Json(found))
}

/// `GET /api/timetables`
pub async fn list_timetables(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<Vec<TimetableSummary>>> {
    // ---
    let summaries = timetable::list_timetables(state.repository().as_ref()).await?;
    Ok(Json(summaries))
}
