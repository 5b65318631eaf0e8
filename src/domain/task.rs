use super::ids::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

text_enum! {
    /// The two independent task lists a student keeps.
    pub enum TaskBoard {
        /// Work currently under way.
        Ongoing => "ongoing",
        /// Upcoming work, the "task corner".
        Corner => "corner",
    }
}

text_enum! {
    pub enum TaskPriority {
        High => "High",
        Medium => "Medium",
        Low => "Low",
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

text_enum! {
    pub enum TaskCategory {
        Study => "Study",
        Project => "Project",
        Personal => "Personal",
    }
}

text_enum! {
    pub enum TaskStatus {
        Pending => "Pending",
        InProgress => "In Progress",
        Completed => "Completed",
    }
}

impl TaskBoard {
    // ---
    pub fn initial_status(self) -> TaskStatus {
        // ---
        match self {
            TaskBoard::Ongoing => TaskStatus::InProgress,
            TaskBoard::Corner => TaskStatus::Pending,
        }
    }

    /// Ongoing tasks have already started, so they can never be pending.
    pub fn allows(self, status: TaskStatus) -> bool {
        !(self == TaskBoard::Ongoing && status == TaskStatus::Pending)
    }

    /// Only the ongoing board tracks start and completion times.
    pub fn tracks_timing(self) -> bool {
        self == TaskBoard::Ongoing
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: RecordId,
    #[serde(skip_serializing)]
    pub board: TaskBoard,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub category: TaskCategory,
    pub due_time: DateTime<Utc>,
    pub status: TaskStatus,
    pub owner_id: RecordId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Optional narrowing for task listings. `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TaskFilter {
    #[serde(default, deserialize_with = "all_or_value")]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "all_or_value")]
    pub category: Option<TaskCategory>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        self.priority.map_or(true, |p| task.priority == p)
            && self.category.map_or(true, |c| task.category == c)
    }
}

/// Status counts for one board.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub completed: u32,
    pub in_progress: u32,
    /// Only reported for the corner board.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending: Option<u32>,
    pub completion_rate: f64,
}

/// Query strings send `"all"` (or nothing) to mean "no filter".
fn all_or_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr<Err = anyhow::Error>,
{
    // ---
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.is_empty() || text.eq_ignore_ascii_case("all") => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
