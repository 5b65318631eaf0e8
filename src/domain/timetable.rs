use super::attendance::SessionType;
use super::clock::ClockTime;
use super::error::{not_blank, CoreError, CoreResult};
use super::ids::RecordId;
use super::repository::Repository;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

text_enum! {
    pub enum Weekday {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
    }
}

/// One scheduled class session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,

    #[validate(length(min = 1, message = "location is required"))]
    pub location: String,

    #[validate(custom(function = "validate_clock"))]
    pub start_time: String,

    #[validate(custom(function = "validate_clock"))]
    pub end_time: String,

    /// Omitted types are read as lectures, but are stored as omitted.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub session_type: Option<SessionType>,
}

impl Slot {
    pub fn session_type(&self) -> SessionType {
        self.session_type.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Day {
    pub day: Weekday,

    #[serde(default)]
    #[validate(nested)]
    pub slots: Vec<Slot>,
}

/// Weekly schedule for one (year, semester) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timetable {
    pub id: RecordId,
    pub year: String,
    pub semester: String,
    pub days: Vec<Day>,
}

/// The listing shape used when choosing a timetable to assign.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableSummary {
    pub id: RecordId,
    pub year: String,
    pub semester: String,
}

impl From<&Timetable> for TimetableSummary {
    fn from(timetable: &Timetable) -> Self {
        TimetableSummary {
            id: timetable.id.clone(),
            year: timetable.year.clone(),
            semester: timetable.semester.clone(),
        }
    }
}

/// Body of a timetable save: the full week for one (year, semester).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TimetableDraft {
    #[validate(custom(function = "not_blank"))]
    pub year: String,
    #[validate(custom(function = "not_blank"))]
    pub semester: String,
    #[serde(default)]
    #[validate(nested)]
    pub days: Vec<Day>,
}

/// Create or overwrite the timetable for the draft's (year, semester).
#[tracing::instrument(skip(repo, draft), fields(year = %draft.year, semester = %draft.semester))]
pub async fn save_timetable(repo: &dyn Repository, draft: TimetableDraft) -> CoreResult<Timetable> {
    // ---
    draft.validate()?;
    let timetable = repo
        .replace_timetable(draft.year.trim(), draft.semester.trim(), draft.days)
        .await?;
    tracing::info!(timetable_id = %timetable.id, "timetable saved");
    Ok(timetable)
}

pub async fn timetable_for(repo: &dyn Repository, year: &str, semester: &str) -> CoreResult<Timetable> {
    // ---
    repo.get_timetable(year, semester)
        .await?
        .ok_or(CoreError::NotFound("timetable"))
}

pub async fn timetable_by_id(repo: &dyn Repository, id: &RecordId) -> CoreResult<Timetable> {
    // ---
    repo.get_timetable_by_id(id)
        .await?
        .ok_or(CoreError::NotFound("timetable"))
}

pub async fn list_timetables(repo: &dyn Repository) -> CoreResult<Vec<TimetableSummary>> {
    // ---
    let timetables = repo.list_timetables().await?;
    Ok(timetables.iter().map(TimetableSummary::from).collect())
}

fn validate_clock(value: &str) -> Result<(), ValidationError> {
    // ---
    match ClockTime::parse(value) {
        Some(_) => Ok(()),
        None => {
            let mut err = ValidationError::new("clock_time");
            err.message = Some("expected a time of day as H:MM or HH:MM".into());
            Err(err)
        }
    }
}
