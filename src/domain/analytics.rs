//! Attendance analytics.
//!
//! Everything here is derived on demand from a student's attendance records
//! and never stored. Marks with unreadable time ranges still count as classes;
//! they only drop out of the study-hours total.

use super::attendance::{AttendanceRecord, AttendanceStatus, SessionType};
use super::clock::TimeRange;
use serde::Serialize;
use std::collections::BTreeMap;

/// Present/absent counts for one bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusTally {
    pub present: u32,
    pub absent: u32,
}

impl StatusTally {
    // ---
    fn record(&mut self, status: AttendanceStatus) {
        // ---
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
        }
    }
}

/// Counts per session type. All three buckets are always reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeBreakdown {
    #[serde(rename = "Lecture")]
    pub lecture: StatusTally,
    #[serde(rename = "Lab")]
    pub lab: StatusTally,
    #[serde(rename = "Tutorial")]
    pub tutorial: StatusTally,
}

impl TypeBreakdown {
    // ---
    pub fn get(&self, session_type: SessionType) -> StatusTally {
        // ---
        match session_type {
            SessionType::Lecture => self.lecture,
            SessionType::Lab => self.lab,
            SessionType::Tutorial => self.tutorial,
        }
    }

    fn bucket_mut(&mut self, session_type: SessionType) -> &mut StatusTally {
        // ---
        match session_type {
            SessionType::Lecture => &mut self.lecture,
            SessionType::Lab => &mut self.lab,
            SessionType::Tutorial => &mut self.tutorial,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceAnalytics {
    pub total_classes: u32,
    pub present_count: u32,
    pub absent_count: u32,
    /// Percentage, two decimals.
    pub attendance_rate: f64,
    /// Hours attended, two decimals.
    pub total_hours: f64,
    pub subject_wise: BTreeMap<String, StatusTally>,
    pub type_wise: TypeBreakdown,
}

/// Aggregate a student's attendance records.
pub fn analyze(records: &[AttendanceRecord]) -> AttendanceAnalytics {
    // ---
    let mut out = AttendanceAnalytics::default();
    let mut hours = 0.0_f64;

    for mark in records.iter().flat_map(|record| record.records.iter()) {
        out.total_classes += 1;

        match mark.status {
            AttendanceStatus::Present => {
                out.present_count += 1;
                hours += attended_hours(&mark.time);
            }
            AttendanceStatus::Absent => out.absent_count += 1,
        }

        out.subject_wise
            .entry(mark.subject.clone())
            .or_default()
            .record(mark.status);
        out.type_wise.bucket_mut(mark.session_type).record(mark.status);
    }

    if out.total_classes > 0 {
        let attended = f64::from(out.total_classes - out.absent_count);
        out.attendance_rate = round2(attended / f64::from(out.total_classes) * 100.0);
    }
    out.total_hours = round2(hours);

    out
}

/// Hours contributed by a present mark; zero when the range is unreadable or empty.
fn attended_hours(time: &str) -> f64 {
    // ---
    match TimeRange::parse(time) {
        Some(range) => {
            let hours = range.duration_hours();
            if hours.is_finite() && hours > 0.0 {
                hours
            } else {
                0.0
            }
        }
        None => {
            tracing::debug!(time, "skipping unreadable time range");
            0.0
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
