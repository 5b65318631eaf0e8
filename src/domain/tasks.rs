//! Task board operations.
//!
//! Both boards share one implementation; [`TaskBoard`] decides which statuses
//! are legal and whether start/completion times are tracked. Every operation
//! on a single task checks that the caller owns it.

use super::error::{not_blank, CoreError, CoreResult};
use super::ids::RecordId;
use super::repository::Repository;
use super::task::{
    Task, TaskBoard, TaskCategory, TaskFilter, TaskPriority, TaskStats, TaskStatus,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[validate(custom(function = "not_blank"))]
    pub description: String,
    #[serde(default)]
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_time: DateTime<Utc>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[validate(custom(function = "not_blank"))]
    pub title: Option<String>,
    #[validate(custom(function = "not_blank"))]
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub category: Option<TaskCategory>,
    pub due_time: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
}

pub async fn list_tasks(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    filter: &TaskFilter,
) -> CoreResult<Vec<Task>> {
    // ---
    Ok(repo.list_tasks(board, owner, filter).await?)
}

pub async fn task_stats(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
) -> CoreResult<TaskStats> {
    // ---
    let tasks = repo.list_tasks(board, owner, &TaskFilter::default()).await?;

    let count = |status: TaskStatus| tasks.iter().filter(|t| t.status == status).count() as u32;
    let completed = count(TaskStatus::Completed);
    let total = tasks.len() as u32;

    Ok(TaskStats {
        completed,
        in_progress: count(TaskStatus::InProgress),
        pending: (board == TaskBoard::Corner).then(|| count(TaskStatus::Pending)),
        completion_rate: if total > 0 {
            f64::from(completed) / f64::from(total) * 100.0
        } else {
            0.0
        },
    })
}

#[tracing::instrument(skip(repo, new))]
pub async fn create_task(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    new: NewTask,
) -> CoreResult<Task> {
    // ---
    new.validate()?;

    let now = Utc::now();
    let task = Task {
        id: RecordId::generate(),
        board,
        title: new.title.trim().to_string(),
        description: new.description.trim().to_string(),
        priority: new.priority,
        category: new.category,
        due_time: new.due_time,
        status: board.initial_status(),
        owner_id: owner.clone(),
        start_time: board.tracks_timing().then_some(now),
        completed_at: None,
        created_at: now,
        updated_at: now,
    };

    let task = repo.create_task(task).await?;
    tracing::info!(task_id = %task.id, "task created");
    Ok(task)
}

#[tracing::instrument(skip(repo, patch))]
pub async fn update_task(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    id: &RecordId,
    patch: TaskPatch,
) -> CoreResult<Task> {
    // ---
    patch.validate()?;
    let mut task = load_owned(repo, board, owner, id).await?;

    if let Some(title) = patch.title {
        task.title = title.trim().to_string();
    }
    if let Some(description) = patch.description {
        task.description = description.trim().to_string();
    }
    if let Some(priority) = patch.priority {
        task.priority = priority;
    }
    if let Some(category) = patch.category {
        task.category = category;
    }
    if let Some(due_time) = patch.due_time {
        task.due_time = due_time;
    }
    if let Some(status) = patch.status {
        apply_status(&mut task, status)?;
    }
    task.updated_at = Utc::now();

    repo.replace_task(&task).await?;
    Ok(task)
}

#[tracing::instrument(skip(repo))]
pub async fn set_task_status(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    id: &RecordId,
    status: TaskStatus,
) -> CoreResult<Task> {
    // ---
    let mut task = load_owned(repo, board, owner, id).await?;
    apply_status(&mut task, status)?;
    task.updated_at = Utc::now();

    repo.replace_task(&task).await?;
    tracing::info!(task_id = %task.id, status = %status, "task status changed");
    Ok(task)
}

#[tracing::instrument(skip(repo))]
pub async fn delete_task(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    id: &RecordId,
) -> CoreResult<()> {
    // ---
    load_owned(repo, board, owner, id).await?;
    if !repo.delete_task(board, id).await? {
        return Err(CoreError::NotFound("task"));
    }
    Ok(())
}

async fn load_owned(
    repo: &dyn Repository,
    board: TaskBoard,
    owner: &RecordId,
    id: &RecordId,
) -> CoreResult<Task> {
    // ---
    let task = repo
        .get_task(board, id)
        .await?
        .ok_or(CoreError::NotFound("task"))?;

    if &task.owner_id != owner {
        tracing::warn!(task_id = %id, %owner, "task belongs to another user");
        return Err(CoreError::Forbidden("Not authorized to modify this task".into()));
    }
    Ok(task)
}

fn apply_status(task: &mut Task, status: TaskStatus) -> CoreResult<()> {
    // ---
    if !task.board.allows(status) {
        return Err(CoreError::Validation(format!(
            "status {status} is not allowed on the {} board",
            task.board
        )));
    }

    if task.board.tracks_timing() {
        match (task.status, status) {
            (previous, TaskStatus::Completed) if previous != TaskStatus::Completed => {
                task.completed_at = Some(Utc::now());
            }
            (_, TaskStatus::Completed) => {}
            _ => task.completed_at = None,
        }
    }
    task.status = status;
    Ok(())
}
