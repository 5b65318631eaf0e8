use super::ids::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

text_enum! {
    /// Academic year a student is enrolled in.
    pub enum AcademicYear {
        Year1 => "Year 1",
        Year2 => "Year 2",
        Year3 => "Year 3",
        Year4 => "Year 4",
    }
}

text_enum! {
    pub enum Semester {
        First => "Semester 1",
        Second => "Semester 2",
    }
}

/// A stored login account.
#[derive(Debug, Clone)]
pub struct User {
    // ---
    pub id: RecordId,
    pub student_id: String,
    pub password_hash: String,
    pub year: AcademicYear,
    pub semester: Semester,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    // ---
    pub fn new(
        student_id: String,
        password_hash: String,
        year: AcademicYear,
        semester: Semester,
        is_admin: bool,
    ) -> Self {
        // ---
        let now = Utc::now();
        Self {
            id: RecordId::generate(),
            student_id,
            password_hash,
            year,
            semester,
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn profile(&self) -> UserProfile {
        // ---
        UserProfile {
            id: self.id.clone(),
            student_id: self.student_id.clone(),
            year: self.year,
            semester: self.semester,
            is_admin: self.is_admin,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Public view of a [`User`]; never carries the password hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: RecordId,
    pub student_id: String,
    pub year: AcademicYear,
    pub semester: Semester,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
