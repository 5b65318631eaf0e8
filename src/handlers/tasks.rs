//! Handlers shared by both task boards.
//!
//! Each handler is generic over a [`BoardKind`] marker, so one set of
//! functions serves `/api/ongoing-tasks` and `/api/tasks`.

use super::error::AppResult;
use super::extract::{record_id, AuthUser, JsonBody, QueryParams};
use super::shared_types::MessageResponse;
use crate::app_state::AppState;
use crate::domain::task::{Task, TaskBoard, TaskFilter, TaskStats, TaskStatus};
use crate::domain::tasks::{self, NewTask, TaskPatch};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, put};
use axum::{Json, Router};
use serde::Deserialize;

/// Selects the board a route set operates on.
pub trait BoardKind: Send + Sync + 'static {
    const BOARD: TaskBoard;
}

pub struct OngoingBoard;
pub struct CornerBoard;

impl BoardKind for OngoingBoard {
    const BOARD: TaskBoard = TaskBoard::Ongoing;
}

impl BoardKind for CornerBoard {
    const BOARD: TaskBoard = TaskBoard::Corner;
}

#[derive(Debug, Deserialize)]
pub struct StatusChange {
    status: TaskStatus,
}

/// Routes for one board, to be nested under its prefix.
pub fn routes<B: BoardKind>() -> Router<AppState> {
    // ---
    Router::new()
        .route("/", get(list_tasks::<B>).post(create_task::<B>))
        .route("/stats", get(task_stats::<B>))
        .route("/filter", get(filter_tasks::<B>))
        .route("/{id}", put(update_task::<B>).delete(delete_task::<B>))
        .route("/{id}/status", patch(update_status::<B>))
}

pub async fn list_tasks<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Task>>> {
    // ---
    let list = tasks::list_tasks(state.repository().as_ref(), B::BOARD, &user.user_id, &TaskFilter::default()).await?;
    Ok(Json(list))
}

pub async fn filter_tasks<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(filter): QueryParams<TaskFilter>,
) -> AppResult<Json<Vec<Task>>> {
    // ---
    let list = tasks::list_tasks(state.repository().as_ref(), B::BOARD, &user.user_id, &filter).await?;
    Ok(Json(list))
}

pub async fn task_stats<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<TaskStats>> {
    // ---
    let stats = tasks::task_stats(state.repository().as_ref(), B::BOARD, &user.user_id).await?;
    Ok(Json(stats))
}

pub async fn create_task<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(new): JsonBody<NewTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    // ---
    let task = tasks::create_task(state.repository().as_ref(), B::BOARD, &user.user_id, new).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn update_task<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<TaskPatch>,
) -> AppResult<Json<Task>> {
    // ---
    let id = record_id(&id)?;
    let task = tasks::update_task(state.repository().as_ref(), B::BOARD, &user.user_id, &id, patch).await?;
    Ok(Json(task))
}

pub async fn update_status<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(change): JsonBody<StatusChange>,
) -> AppResult<Json<Task>> {
    // ---
    let id = record_id(&id)?;
    let task =
        tasks::set_task_status(state.repository().as_ref(), B::BOARD, &user.user_id, &id, change.status).await?;
    Ok(Json(task))
}

pub async fn delete_task<B: BoardKind>(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    // ---
    let id = record_id(&id)?;
    tasks::delete_task(state.repository().as_ref(), B::BOARD, &user.user_id, &id).await?;
    Ok(Json(MessageResponse::new("Task deleted successfully")))
}
