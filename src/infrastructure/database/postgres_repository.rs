use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::domain::assignment::Assignment;
use crate::domain::attendance::{AttendanceMark, AttendanceRecord, DateRange, Upserted};
use crate::domain::task::{Task, TaskBoard, TaskFilter};
use crate::domain::timetable::{Day, Timetable};
use crate::domain::user::User;
use crate::domain::{DuplicateStudentId, RecordId, Repository};

/// Surface a `users.student_id` unique violation as [`DuplicateStudentId`].
fn duplicate_or(err: sqlx::Error, student_id: &str, action: &str) -> anyhow::Error {
    // ---
    if err.as_database_error().is_some_and(|e| e.is_unique_violation()) {
        return DuplicateStudentId(student_id.to_string()).into();
    }
    anyhow::Error::new(err).context(format!("{action} {student_id}"))
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    student_id: String,
    password_hash: String,
    year: String,
    semester: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TimetableRow {
    id: String,
    year: String,
    semester: String,
    days: Json<Vec<Day>>,
}

#[derive(sqlx::FromRow)]
struct AssignmentRow {
    id: String,
    student_id: String,
    timetable_id: String,
    assigned_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct AttendanceRow {
    id: String,
    student_id: String,
    date: NaiveDate,
    records: Json<Vec<AttendanceMark>>,
    created_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct TaskRow {
    id: String,
    board: String,
    owner_id: String,
    title: String,
    description: String,
    priority: String,
    category: String,
    status: String,
    due_time: DateTime<Utc>,
    start_time: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

const USER_COLUMNS: &str =
    "id, student_id, password_hash, year, semester, is_admin, created_at, updated_at";
const TASK_COLUMNS: &str = "id, board, owner_id, title, description, priority, category, status, \
     due_time, start_time, completed_at, created_at, updated_at";

impl TryFrom<UserRow> for User {
    type Error = anyhow::Error;

    fn try_from(r: UserRow) -> Result<Self> {
        // ---
        Ok(User {
            id: RecordId::from_trusted(r.id),
            student_id: r.student_id,
            password_hash: r.password_hash,
            year: r.year.parse()?,
            semester: r.semester.parse()?,
            is_admin: r.is_admin,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

impl From<TimetableRow> for Timetable {
    fn from(r: TimetableRow) -> Self {
        Timetable {
            id: RecordId::from_trusted(r.id),
            year: r.year,
            semester: r.semester,
            days: r.days.0,
        }
    }
}

impl From<AssignmentRow> for Assignment {
    fn from(r: AssignmentRow) -> Self {
        Assignment {
            id: RecordId::from_trusted(r.id),
            student_id: RecordId::from_trusted(r.student_id),
            timetable_id: RecordId::from_trusted(r.timetable_id),
            assigned_at: r.assigned_at,
        }
    }
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(r: AttendanceRow) -> Self {
        AttendanceRecord {
            id: RecordId::from_trusted(r.id),
            student_id: RecordId::from_trusted(r.student_id),
            date: r.date,
            records: r.records.0,
            created_at: r.created_at,
        }
    }
}

impl TryFrom<TaskRow> for Task {
    type Error = anyhow::Error;

    fn try_from(r: TaskRow) -> Result<Self> {
        // ---
        Ok(Task {
            id: RecordId::from_trusted(r.id),
            board: r.board.parse()?,
            title: r.title,
            description: r.description,
            priority: r.priority.parse()?,
            category: r.category.parse()?,
            due_time: r.due_time,
            status: r.status.parse()?,
            owner_id: RecordId::from_trusted(r.owner_id),
            start_time: r.start_time,
            completed_at: r.completed_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

pub struct PostgresRepository {
    // ---
    pool: PgPool,
}

impl PostgresRepository {
    // ---
    pub fn new(pool: PgPool) -> Self {
        // ---
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Repository for PostgresRepository {
    // ---
    async fn ping(&self) -> Result<()> {
        // ---
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: User) -> Result<User> {
        // ---
        sqlx::query(
            "INSERT INTO users (id, student_id, password_hash, year, semester, is_admin, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.id.as_str())
        .bind(&user.student_id)
        .bind(&user.password_hash)
        .bind(user.year.as_str())
        .bind(user.semester.as_str())
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| duplicate_or(err, &user.student_id, "failed to insert user"))?;

        Ok(user)
    }

    async fn get_user_by_id(&self, id: &RecordId) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        row.map(User::try_from).transpose()
    }

    async fn get_user_by_student_id(&self, student_id: &str) -> Result<Option<User>> {
        // ---
        let row = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE student_id = $1"
        ))
        .bind(student_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(User::try_from).transpose()
    }

    async fn update_user(&self, user: &User) -> Result<()> {
        // ---
        sqlx::query(
            "UPDATE users
             SET student_id = $2, password_hash = $3, year = $4, semester = $5,
                 is_admin = $6, updated_at = $7
             WHERE id = $1",
        )
        .bind(user.id.as_str())
        .bind(&user.student_id)
        .bind(&user.password_hash)
        .bind(user.year.as_str())
        .bind(user.semester.as_str())
        .bind(user.is_admin)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| duplicate_or(err, &user.student_id, "failed to update user"))?;

        Ok(())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        // ---
        let rows = sqlx::query_as::<_, UserRow>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(User::try_from).collect()
    }

    async fn replace_timetable(&self, year: &str, semester: &str, days: Vec<Day>) -> Result<Timetable> {
        // ---
        let row = sqlx::query_as::<_, TimetableRow>(
            "INSERT INTO timetables (id, year, semester, days)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (year, semester) DO UPDATE SET days = EXCLUDED.days
             RETURNING id, year, semester, days",
        )
        .bind(RecordId::generate().as_str())
        .bind(year)
        .bind(semester)
        .bind(Json(days))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_timetable(&self, year: &str, semester: &str) -> Result<Option<Timetable>> {
        // ---
        let row = sqlx::query_as::<_, TimetableRow>(
            "SELECT id, year, semester, days FROM timetables WHERE year = $1 AND semester = $2",
        )
        .bind(year)
        .bind(semester)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Timetable::from))
    }

    async fn get_timetable_by_id(&self, id: &RecordId) -> Result<Option<Timetable>> {
        // ---
        let row = sqlx::query_as::<_, TimetableRow>(
            "SELECT id, year, semester, days FROM timetables WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Timetable::from))
    }

    async fn list_timetables(&self) -> Result<Vec<Timetable>> {
        // ---
        let rows = sqlx::query_as::<_, TimetableRow>(
            "SELECT id, year, semester, days FROM timetables ORDER BY year, semester",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Timetable::from).collect())
    }

    async fn replace_assignment(&self, student_id: &RecordId, timetable_id: &RecordId) -> Result<Assignment> {
        // ---
        let row = sqlx::query_as::<_, AssignmentRow>(
            "INSERT INTO timetable_assignments (id, student_id, timetable_id, assigned_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (student_id) DO UPDATE
                 SET timetable_id = EXCLUDED.timetable_id, assigned_at = EXCLUDED.assigned_at
             RETURNING id, student_id, timetable_id, assigned_at",
        )
        .bind(RecordId::generate().as_str())
        .bind(student_id.as_str())
        .bind(timetable_id.as_str())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_assignment_by_student(&self, student_id: &RecordId) -> Result<Option<Assignment>> {
        // ---
        let row = sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, student_id, timetable_id, assigned_at
             FROM timetable_assignments WHERE student_id = $1",
        )
        .bind(student_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Assignment::from))
    }

    async fn list_assignments(&self) -> Result<Vec<Assignment>> {
        // ---
        let rows = sqlx::query_as::<_, AssignmentRow>(
            "SELECT id, student_id, timetable_id, assigned_at
             FROM timetable_assignments ORDER BY assigned_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Assignment::from).collect())
    }

    async fn replace_attendance_day(
        &self,
        student_id: &RecordId,
        date: NaiveDate,
        records: Vec<AttendanceMark>,
    ) -> Result<Upserted<AttendanceRecord>> {
        // ---
        #[derive(sqlx::FromRow)]
        struct UpsertRow {
            #[sqlx(flatten)]
            record: AttendanceRow,
            inserted: bool,
        }

        // xmax is zero only for a freshly inserted tuple.
        let row = sqlx::query_as::<_, UpsertRow>(
            "INSERT INTO attendance (id, student_id, date, records, created_at)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (student_id, date) DO UPDATE SET records = EXCLUDED.records
             RETURNING id, student_id, date, records, created_at, (xmax = 0) AS inserted",
        )
        .bind(RecordId::generate().as_str())
        .bind(student_id.as_str())
        .bind(date)
        .bind(Json(records))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        let record = AttendanceRecord::from(row.record);
        Ok(if row.inserted {
            Upserted::Created(record)
        } else {
            Upserted::Replaced(record)
        })
    }

    async fn list_attendance(
        &self,
        student_id: &RecordId,
        range: Option<DateRange>,
    ) -> Result<Vec<AttendanceRecord>> {
        // ---
        let rows = sqlx::query_as::<_, AttendanceRow>(
            "SELECT id, student_id, date, records, created_at
             FROM attendance
             WHERE student_id = $1
               AND ($2::date IS NULL OR date BETWEEN $2 AND $3)
             ORDER BY date DESC",
        )
        .bind(student_id.as_str())
        .bind(range.map(|r| r.start))
        .bind(range.map(|r| r.end))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }

    async fn create_task(&self, task: Task) -> Result<Task> {
        // ---
        sqlx::query(&format!(
            "INSERT INTO tasks ({TASK_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(task.id.as_str())
        .bind(task.board.as_str())
        .bind(task.owner_id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(task.status.as_str())
        .bind(task.due_time)
        .bind(task.start_time)
        .bind(task.completed_at)
        .bind(task.created_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(task)
    }

    async fn get_task(&self, board: TaskBoard, id: &RecordId) -> Result<Option<Task>> {
        // ---
        let row = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE board = $1 AND id = $2"
        ))
        .bind(board.as_str())
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Task::try_from).transpose()
    }

    async fn list_tasks(&self, board: TaskBoard, owner: &RecordId, filter: &TaskFilter) -> Result<Vec<Task>> {
        // ---
        let rows = sqlx::query_as::<_, TaskRow>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE board = $1 AND owner_id = $2
               AND ($3::text IS NULL OR priority = $3)
               AND ($4::text IS NULL OR category = $4)
             ORDER BY due_time, created_at"
        ))
        .bind(board.as_str())
        .bind(owner.as_str())
        .bind(filter.priority.map(|p| p.as_str()))
        .bind(filter.category.map(|c| c.as_str()))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn replace_task(&self, task: &Task) -> Result<()> {
        // ---
        sqlx::query(
            "UPDATE tasks
             SET title = $3, description = $4, priority = $5, category = $6, status = $7,
                 due_time = $8, start_time = $9, completed_at = $10, updated_at = $11
             WHERE board = $1 AND id = $2",
        )
        .bind(task.board.as_str())
        .bind(task.id.as_str())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.as_str())
        .bind(task.category.as_str())
        .bind(task.status.as_str())
        .bind(task.due_time)
        .bind(task.start_time)
        .bind(task.completed_at)
        .bind(task.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_task(&self, board: TaskBoard, id: &RecordId) -> Result<bool> {
        // ---
        let result = sqlx::query("DELETE FROM tasks WHERE board = $1 AND id = $2")
            .bind(board.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
