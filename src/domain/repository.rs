use super::assignment::Assignment;
use super::attendance::{AttendanceMark, AttendanceRecord, DateRange, Upserted};
use super::ids::RecordId;
use super::task::{Task, TaskBoard, TaskFilter};
use super::timetable::{Day, Timetable};
use super::user::User;
use anyhow::Result;
use chrono::NaiveDate;
use std::sync::Arc;

/// Raised by [`Repository::create_user`] and [`Repository::update_user`] when
/// the student ID belongs to another account.
#[derive(Debug, thiserror::Error)]
#[error("student ID {0} already exists")]
pub struct DuplicateStudentId(pub String);

/// Abstraction for persistent storage.
///
/// Every "replace" method is a single upsert: the stored value is overwritten
/// wholesale, never merged field by field.
#[async_trait::async_trait]
pub trait Repository: Send + Sync {
    // ---
    /// Cheap round trip used by the full health check.
    async fn ping(&self) -> Result<()>;

    // --- users

    /// Insert a new user. Fails with [`DuplicateStudentId`] if the student ID is taken.
    async fn create_user(&self, user: User) -> Result<User>;

    async fn get_user_by_id(&self, id: &RecordId) -> Result<Option<User>>;

    async fn get_user_by_student_id(&self, student_id: &str) -> Result<Option<User>>;

    /// Overwrite the mutable fields of an existing user. Fails with
    /// [`DuplicateStudentId`] if the new student ID is taken.
    async fn update_user(&self, user: &User) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<User>>;

    // --- timetables

    /// Replace the day list for (year, semester), creating the timetable if needed.
    async fn replace_timetable(
        &self,
        year: &str,
        semester: &str,
        days: Vec<Day>,
    ) -> Result<Timetable>;

    async fn get_timetable(&self, year: &str, semester: &str) -> Result<Option<Timetable>>;

    async fn get_timetable_by_id(&self, id: &RecordId) -> Result<Option<Timetable>>;

    async fn list_timetables(&self) -> Result<Vec<Timetable>>;

    // --- assignments

    /// Point the student's single assignment at `timetable_id`.
    async fn replace_assignment(
        &self,
        student_id: &RecordId,
        timetable_id: &RecordId,
    ) -> Result<Assignment>;

    async fn get_assignment_by_student(&self, student_id: &RecordId)
        -> Result<Option<Assignment>>;

    async fn list_assignments(&self) -> Result<Vec<Assignment>>;

    // --- attendance

    /// Store the marks for (student, date), discarding any earlier marks for that day.
    async fn replace_attendance_day(
        &self,
        student_id: &RecordId,
        date: NaiveDate,
        records: Vec<AttendanceMark>,
    ) -> Result<Upserted<AttendanceRecord>>;

    /// Attendance days for a student, newest first.
    async fn list_attendance(
        &self,
        student_id: &RecordId,
        range: Option<DateRange>,
    ) -> Result<Vec<AttendanceRecord>>;

    // --- tasks

    async fn create_task(&self, task: Task) -> Result<Task>;

    async fn get_task(&self, board: TaskBoard, id: &RecordId) -> Result<Option<Task>>;

    /// Tasks on a board owned by `owner`, earliest due first.
    async fn list_tasks(
        &self,
        board: TaskBoard,
        owner: &RecordId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>>;

    async fn replace_task(&self, task: &Task) -> Result<()>;

    /// Returns `false` when nothing was deleted.
    async fn delete_task(&self, board: TaskBoard, id: &RecordId) -> Result<bool>;
}

/// Type alias for any backend that implements Repository.
pub type RepositoryPtr = Arc<dyn Repository>;
