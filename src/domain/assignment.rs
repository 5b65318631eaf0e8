//! Timetable assignment: which weekly schedule a student follows.
//!
//! Students can be addressed by internal id or by their institution-issued
//! student ID (see [`StudentRef`]). Resolution happens in two steps so callers
//! can apply an access check between finding the student and reading the
//! assignment.

use super::error::{CoreError, CoreResult};
use super::ids::{RecordId, StudentRef};
use super::repository::Repository;
use super::timetable::Timetable;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: RecordId,
    pub student_id: RecordId,
    pub timetable_id: RecordId,
    pub assigned_at: DateTime<Utc>,
}

/// An assignment together with the timetable it points at.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAssignment {
    pub assignment: Assignment,
    pub timetable: Timetable,
}

/// Admin overview row: the assignment plus the labels needed to display it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentOverview {
    pub id: RecordId,
    pub student: Option<StudentLabel>,
    pub timetable: Option<TimetableLabel>,
    pub assigned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentLabel {
    pub id: RecordId,
    pub student_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableLabel {
    pub id: RecordId,
    pub year: String,
    pub semester: String,
}

/// Turn a student reference into an internal id.
///
/// Internal ids are trusted as-is; the store is not consulted.
pub async fn resolve_student(repo: &dyn Repository, student: &StudentRef) -> CoreResult<RecordId> {
    // ---
    match student {
        StudentRef::Internal(id) => {
            tracing::debug!(%id, "student token is an internal id");
            Ok(id.clone())
        }
        StudentRef::External(code) => {
            tracing::debug!(code = %code, "student token is a student ID, looking up user");
            let user = repo
                .get_user_by_student_id(code)
                .await?
                .ok_or(CoreError::NotFound("user"))?;
            Ok(user.id)
        }
    }
}

/// Load a student's assignment and its timetable.
pub async fn find_assignment(
    repo: &dyn Repository,
    student_id: &RecordId,
) -> CoreResult<ResolvedAssignment> {
    // ---
    let assignment = repo
        .get_assignment_by_student(student_id)
        .await?
        .ok_or_else(|| {
            tracing::debug!(%student_id, "student has no timetable assigned");
            CoreError::NotFound("assignment")
        })?;

    let timetable = repo
        .get_timetable_by_id(&assignment.timetable_id)
        .await?
        .ok_or(CoreError::NotFound("timetable"))?;

    Ok(ResolvedAssignment {
        assignment,
        timetable,
    })
}

/// Classify `token`, resolve the student and load the assignment.
pub async fn resolve_assignment(
    repo: &dyn Repository,
    token: &str,
) -> CoreResult<ResolvedAssignment> {
    // ---
    let student = StudentRef::classify(token);
    let student_id = resolve_student(repo, &student).await?;
    find_assignment(repo, &student_id).await
}

/// Assign a timetable to a student, replacing any earlier assignment.
#[tracing::instrument(skip(repo))]
pub async fn assign_timetable(
    repo: &dyn Repository,
    student_id: &RecordId,
    timetable_id: &RecordId,
) -> CoreResult<Assignment> {
    // ---
    repo.get_user_by_id(student_id)
        .await?
        .ok_or(CoreError::NotFound("user"))?;

    repo.get_timetable_by_id(timetable_id)
        .await?
        .ok_or(CoreError::NotFound("timetable"))?;

    let assignment = repo.replace_assignment(student_id, timetable_id).await?;
    tracing::info!(assignment_id = %assignment.id, "timetable assigned");

    Ok(assignment)
}

/// Every assignment with student and timetable labels for display.
pub async fn list_assignments(repo: &dyn Repository) -> CoreResult<Vec<AssignmentOverview>> {
    // ---
    let users: HashMap<RecordId, String> = repo
        .list_users()
        .await?
        .into_iter()
        .map(|user| (user.id, user.student_id))
        .collect();

    let timetables: HashMap<RecordId, Timetable> = repo
        .list_timetables()
        .await?
        .into_iter()
        .map(|timetable| (timetable.id.clone(), timetable))
        .collect();

    let overview = repo
        .list_assignments()
        .await?
        .into_iter()
        .map(|assignment| AssignmentOverview {
            student: users.get(&assignment.student_id).map(|code| StudentLabel {
                id: assignment.student_id.clone(),
                student_id: code.clone(),
            }),
            timetable: timetables.get(&assignment.timetable_id).map(|t| TimetableLabel {
                id: t.id.clone(),
                year: t.year.clone(),
                semester: t.semester.clone(),
            }),
            id: assignment.id,
            assigned_at: assignment.assigned_at,
        })
        .collect();

    Ok(overview)
}
