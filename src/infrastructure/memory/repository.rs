//! In-process repository.
//!
//! Backs `PORTAL_STORAGE=memory` and the test suites. Each write takes one
//! write lock for its whole read-modify-write, so upserts behave like the
//! single-statement upserts of the PostgreSQL backend.

use crate::domain::assignment::Assignment;
use crate::domain::attendance::{AttendanceMark, AttendanceRecord, DateRange, Upserted};
use crate::domain::task::{Task, TaskBoard, TaskFilter};
use crate::domain::timetable::{Day, Timetable};
use crate::domain::user::User;
use crate::domain::{DuplicateStudentId, RecordId, Repository};
use anyhow::{anyhow, Result};
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    // ---
    users: Vec<User>,
    timetables: Vec<Timetable>,
    assignments: Vec<Assignment>,
    attendance: Vec<AttendanceRecord>,
    tasks: HashMap<(TaskBoard, RecordId), Task>,
}

#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
}

impl MemoryRepository {
    // ---
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }
}

#[async_trait::async_trait]
impl Repository for MemoryRepository {
    // ---
    async fn ping(&self) -> Result<()> {
        self.read().map(|_| ())
    }

    async fn create_user(&self, user: User) -> Result<User> {
        // ---
        let mut tables = self.write()?;
        if tables.users.iter().any(|u| u.student_id == user.student_id) {
            return Err(DuplicateStudentId(user.student_id.clone()).into());
        }
        tables.users.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &RecordId) -> Result<Option<User>> {
        Ok(self.read()?.users.iter().find(|u| &u.id == id).cloned())
    }

    async fn get_user_by_student_id(&self, student_id: &str) -> Result<Option<User>> {
        // ---
        let tables = self.read()?;
        Ok(tables.users.iter().find(|u| u.student_id == student_id).cloned())
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        // ---
        let mut tables = self.write()?;
        if tables
            .users
            .iter()
            .any(|u| u.student_id == user.student_id && u.id != user.id)
        {
            return Err(DuplicateStudentId(user.student_id.clone()).into());
        }
        let slot = tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| anyhow!("user {} does not exist", user.id))?;
        *slot = user.clone();
        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.read()?.users.clone())
    }

    async fn replace_timetable(&self, year: &str, semester: &str, days: Vec<Day>) -> Result<Timetable> {
        // ---
        let mut tables = self.write()?;
        if let Some(existing) = tables
            .timetables
            .iter_mut()
            .find(|t| t.year == year && t.semester == semester)
        {
            existing.days = days;
            return Ok(existing.clone());
        }

        let timetable = Timetable {
            id: RecordId::generate(),
            year: year.to_string(),
            semester: semester.to_string(),
            days,
        };
        tables.timetables.push(timetable.clone());
        Ok(timetable)
    }

    async fn get_timetable(&self, year: &str, semester: &str) -> Result<Option<Timetable>> {
        // ---
        let tables = self.read()?;
        Ok(tables
            .timetables
            .iter()
            .find(|t| t.year == year && t.semester == semester)
            .cloned())
    }

    async fn get_timetable_by_id(&self, id: &RecordId) -> Result<Option<Timetable>> {
        Ok(self.read()?.timetables.iter().find(|t| &t.id == id).cloned())
    }

    async fn list_timetables(&self) -> Result<Vec<Timetable>> {
        Ok(self.read()?.timetables.clone())
    }

    async fn replace_assignment(&self, student_id: &RecordId, timetable_id: &RecordId) -> Result<Assignment> {
        // ---
        let mut tables = self.write()?;
        let now = Utc::now();

        if let Some(existing) = tables
            .assignments
            .iter_mut()
            .find(|a| &a.student_id == student_id)
        {
            existing.timetable_id = timetable_id.clone();
            existing.assigned_at = now;
            return Ok(existing.clone());
        }

        let assignment = Assignment {
            id: RecordId::generate(),
            student_id: student_id.clone(),
            timetable_id: timetable_id.clone(),
            assigned_at: now,
        };
        tables.assignments.push(assignment.clone());
        Ok(assignment)
    }

    async fn get_assignment_by_student(&self, student_id: &RecordId) -> Result<Option<Assignment>> {
        // ---
        let tables = self.read()?;
        Ok(tables
            .assignments
            .iter()
            .find(|a| &a.student_id == student_id)
            .cloned())
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        // ---
        let mut assignments = self.read()?.assignments.clone();
        assignments.sort_by(|a, b| b.assigned_at.cmp(&a.assigned_at));
        Ok(assignments)
    }

    async fn replace_attendance_day(
        &self,
        student_id: &RecordId,
        date: NaiveDate,
        records: Vec<AttendanceMark>,
    ) -> Result<Upserted<AttendanceRecord>> {
        // ---
        let mut tables = self.write()?;
        if let Some(existing) = tables
            .attendance
            .iter_mut()
            .find(|r| &r.student_id == student_id && r.date == date)
        {
            existing.records = records;
            return Ok(Upserted::Replaced(existing.clone()));
        }

        let record = AttendanceRecord {
            id: RecordId::generate(),
            student_id: student_id.clone(),
            date,
            records,
            created_at: Utc::now(),
        };
        tables.attendance.push(record.clone());
        Ok(Upserted::Created(record))
    }

    async fn list_attendance(
        &self,
        student_id: &RecordId,
        range: Option<DateRange>,
    ) -> Result<Vec<AttendanceRecord>> {
        // ---
        let tables = self.read()?;
        let mut records: Vec<_> = tables
            .attendance
            .iter()
            .filter(|r| &r.student_id == student_id)
            .filter(|r| range.map_or(true, |range| range.contains(r.date)))
            .cloned()
            .collect();
        records.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(records)
    }

    async fn create_task(&self, task: Task) -> Result<Task> {
        // ---
        let mut tables = self.write()?;
        tables
            .tasks
            .insert((task.board, task.id.clone()), task.clone());
        Ok(task)
    }

    async fn get_task(&self, board: TaskBoard, id: &RecordId) -> Result<Option<Task>> {
        Ok(self.read()?.tasks.get(&(board, id.clone())).cloned())
    }

    async fn list_tasks(&self, board: TaskBoard, owner: &RecordId, filter: &TaskFilter) -> Result<Vec<Task>> {
        // ---
        let tables = self.read()?;
        let mut tasks: Vec<_> = tables
            .tasks
            .values()
            .filter(|t| t.board == board && &t.owner_id == owner && filter.matches(t))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.due_time.cmp(&b.due_time).then_with(|| a.created_at.cmp(&b.created_at)));
        Ok(tasks)
    }

    async fn replace_task(&self, task: &Task) -> Result<()> {
        // ---
        let mut tables = self.write()?;
        let slot = tables
            .tasks
            .get_mut(&(task.board, task.id.clone()))
            .ok_or_else(|| anyhow!("task {} does not exist", task.id))?;
        *slot = task.clone();
        Ok(())
    }

    async fn delete_task(&self, board: TaskBoard, id: &RecordId) -> Result<bool> {
        Ok(self.write()?.tasks.remove(&(board, id.clone())).is_some())
    }
}
