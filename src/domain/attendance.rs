//! Attendance ledger: one record per student per calendar day.

use super::error::CoreResult;
use super::ids::RecordId;
use super::repository::Repository;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

text_enum! {
    pub enum AttendanceStatus {
        Present => "present",
        Absent => "absent",
    }
}

text_enum! {
    /// Kind of class session. Unknown kinds are refused at deserialization.
    pub enum SessionType {
        Lecture => "Lecture",
        Lab => "Lab",
        Tutorial => "Tutorial",
    }
}

impl Default for SessionType {
    fn default() -> Self {
        SessionType::Lecture
    }
}

/// Attendance for one subject session on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct AttendanceMark {
    #[validate(length(min = 1, message = "subject is required"))]
    pub subject: String,

    pub status: AttendanceStatus,

    /// Free text, normally `"HH:MM - HH:MM"`. Only presence is checked, so
    /// odd entries still count toward attendance.
    #[validate(length(min = 1, message = "time is required"))]
    pub time: String,

    #[serde(rename = "type", default)]
    pub session_type: SessionType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub id: RecordId,
    pub student_id: RecordId,
    pub date: NaiveDate,
    pub records: Vec<AttendanceMark>,
    pub created_at: DateTime<Utc>,
}

/// Result of a write that either created a row or replaced an existing one.
#[derive(Debug, Clone, PartialEq)]
pub enum Upserted<T> {
    Created(T),
    Replaced(T),
}

impl<T> Upserted<T> {
    // ---
    pub fn is_created(&self) -> bool {
        matches!(self, Upserted::Created(_))
    }

    pub fn into_inner(self) -> T {
        // ---
        match self {
            Upserted::Created(value) | Upserted::Replaced(value) => value,
        }
    }
}

/// Inclusive calendar range used to narrow attendance history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// A range only applies when both ends are supplied.
    pub fn from_bounds(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        Some(DateRange { start: start?, end: end? })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Record a student's attendance for one day.
///
/// Re-submitting a day throws away the previous marks for that day. Every
/// mark needs a subject and a time; nothing is stored otherwise.
#[tracing::instrument(skip(repo, marks))]
pub async fn submit_attendance(
    repo: &dyn Repository,
    student_id: &RecordId,
    date: NaiveDate,
    marks: Vec<AttendanceMark>,
) -> CoreResult<Upserted<AttendanceRecord>> {
    // ---
    for mark in &marks {
        mark.validate()?;
    }
    let outcome = repo.replace_attendance_day(student_id, date, marks).await?;

    match &outcome {
        Upserted::Created(record) => {
            tracing::info!(record_id = %record.id, "attendance day created")
        }
        Upserted::Replaced(record) => {
            tracing::info!(record_id = %record.id, "attendance day replaced")
        }
    }

    Ok(outcome)
}

/// A student's attendance days, newest first.
pub async fn attendance_history(
    repo: &dyn Repository,
    student_id: &RecordId,
    range: Option<DateRange>,
) -> CoreResult<Vec<AttendanceRecord>> {
    // ---
    Ok(repo.list_attendance(student_id, range).await?)
}

/// Accept either a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp.
pub fn deserialize_calendar_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    let text = String::deserialize(deserializer)?;
    parse_calendar_date(&text).ok_or_else(|| {
        serde::de::Error::custom(format!("expected YYYY-MM-DD or RFC 3339 date, got {text:?}"))
    })
}

/// Optional variant of [`deserialize_calendar_date`] for query strings.
pub fn deserialize_optional_calendar_date<'de, D>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    // ---
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.trim().is_empty() => Ok(None),
        Some(text) => parse_calendar_date(&text).map(Some).ok_or_else(|| {
            serde::de::Error::custom(format!("expected YYYY-MM-DD or RFC 3339 date, got {text:?}"))
        }),
    }
}

fn parse_calendar_date(text: &str) -> Option<NaiveDate> {
    // ---
    let text = text.trim();
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok().or_else(|| {
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|ts| ts.with_timezone(&Utc).date_naive())
    })
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::infrastructure::create_memory_repository;

    fn mark(subject: &str, status: AttendanceStatus) -> AttendanceMark {
        // ---
        AttendanceMark {
            subject: subject.to_string(),
            status,
            time: "09:00 - 10:00".to_string(),
            session_type: SessionType::Lecture,
        }
    }

    fn day(text: &str) -> NaiveDate {
        NaiveDate::parse_from_str(text, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn resubmitting_a_day_replaces_its_marks() {
        // ---
        let repo = create_memory_repository();
        let student = RecordId::generate();
        let date = day("2024-03-04");

        let first = submit_attendance(
            repo.as_ref(),
            &student,
            date,
            vec![
                mark("Math", AttendanceStatus::Present),
                mark("Physics", AttendanceStatus::Absent),
            ],
        )
        .await
        .unwrap();
        assert!(first.is_created());

        let second = submit_attendance(
            repo.as_ref(),
            &student,
            date,
            vec![mark("Chemistry", AttendanceStatus::Present)],
        )
        .await
        .unwrap();
        assert!(!second.is_created());

        let first = first.into_inner();
        let second = second.into_inner();
        assert_eq!(first.id, second.id, "same day keeps its record");

        let history = attendance_history(repo.as_ref(), &student, None).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].records, vec![mark("Chemistry", AttendanceStatus::Present)]);
    }

    #[tokio::test]
    async fn history_is_newest_first_and_range_is_inclusive() {
        // ---
        let repo = create_memory_repository();
        let student = RecordId::generate();
        let other = RecordId::generate();

        for date in ["2024-01-01", "2024-01-03", "2024-01-02"] {
            submit_attendance(
                repo.as_ref(),
                &student,
                day(date),
                vec![mark("Math", AttendanceStatus::Present)],
            )
            .await
            .unwrap();
        }
        submit_attendance(repo.as_ref(), &other, day("2024-01-02"), vec![])
            .await
            .unwrap();

        let all = attendance_history(repo.as_ref(), &student, None).await.unwrap();
        let dates: Vec<_> = all.iter().map(|r| r.date).collect();
        assert_eq!(dates, vec![day("2024-01-03"), day("2024-01-02"), day("2024-01-01")]);

        let range = DateRange::from_bounds(Some(day("2024-01-02")), Some(day("2024-01-03")));
        let narrowed = attendance_history(repo.as_ref(), &student, range).await.unwrap();
        assert_eq!(narrowed.len(), 2);
    }

    #[tokio::test]
    async fn marks_without_subject_are_refused() {
        // ---
        let repo = create_memory_repository();
        let student = RecordId::generate();
        let err = submit_attendance(
            repo.as_ref(),
            &student,
            day("2024-03-05"),
            vec![mark("", AttendanceStatus::Present)],
        )
        .await
        .unwrap_err();
        assert!(matches!(err, crate::domain::CoreError::Validation(_)));
        assert!(attendance_history(repo.as_ref(), &student, None).await.unwrap().is_empty());
    }

    #[test]
    fn range_needs_both_bounds() {
        // ---
        assert!(DateRange::from_bounds(Some(day("2024-01-01")), None).is_none());
        assert!(DateRange::from_bounds(None, Some(day("2024-01-01"))).is_none());
    }

    #[test]
    fn calendar_dates_accept_plain_and_timestamp_forms() {
        // ---
        assert_eq!(parse_calendar_date("2024-05-06"), Some(day("2024-05-06")));
        assert_eq!(
            parse_calendar_date("2024-05-06T00:00:00.000Z"),
            Some(day("2024-05-06"))
        );
        assert_eq!(parse_calendar_date("06/05/2024"), None);
    }

    #[test]
    fn marks_default_to_lecture_and_reject_unknown_types() {
        // ---
        let mark: AttendanceMark = serde_json::from_str(
            r#"{"subject":"Math","status":"present","time":"09:00 - 10:00"}"#,
        )
        .unwrap();
        assert_eq!(mark.session_type, SessionType::Lecture);

        let unknown = serde_json::from_str::<AttendanceMark>(
            r#"{"subject":"Math","status":"present","time":"09:00 - 10:00","type":"Seminar"}"#,
        );
        assert!(unknown.is_err());
    }
}
