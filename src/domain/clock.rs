//! Time-of-day values as typed into the timetable and attendance forms.

const MINUTES_PER_DAY: u32 = 24 * 60;

/// A wall-clock time, stored as minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ClockTime(u32);

impl ClockTime {
    // ---
    /// Parse `H:MM` or `HH:MM`. Surrounding whitespace is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        // ---
        let (hours, minutes) = text.trim().split_once(':')?;
        if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
            return None;
        }
        if !hours.bytes().chain(minutes.bytes()).all(|b| b.is_ascii_digit()) {
            return None;
        }
        let hours: u32 = hours.parse().ok()?;
        let minutes: u32 = minutes.parse().ok()?;
        (hours < 24 && minutes < 60).then_some(ClockTime(hours * 60 + minutes))
    }

    pub fn minutes_since_midnight(self) -> u32 {
        self.0
    }
}

/// A `"start - end"` range. An end before the start means the session ran
/// past midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: ClockTime,
    pub end: ClockTime,
}

impl TimeRange {
    // ---
    pub fn parse(text: &str) -> Option<Self> {
        // ---
        let (start, end) = text.split_once(" - ")?;
        Some(TimeRange {
            start: ClockTime::parse(start)?,
            end: ClockTime::parse(end)?,
        })
    }

    pub fn duration_minutes(&self) -> u32 {
        // ---
        let start = self.start.minutes_since_midnight();
        let mut end = self.end.minutes_since_midnight();
        if end < start {
            end += MINUTES_PER_DAY;
        }
        end - start
    }

    pub fn duration_hours(&self) -> f64 {
        f64::from(self.duration_minutes()) / 60.0
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn clock_accepts_one_or_two_digit_hours() {
        // ---
        assert_eq!(ClockTime::parse("9:05").map(ClockTime::minutes_since_midnight), Some(545));
        assert_eq!(ClockTime::parse("09:05").map(ClockTime::minutes_since_midnight), Some(545));
        assert_eq!(ClockTime::parse(" 23:59 ").map(ClockTime::minutes_since_midnight), Some(1439));
    }

    #[test]
    fn clock_rejects_out_of_range_and_garbage() {
        // ---
        let garbage = [
            "24:00", "12:60", "12:5", "123:00", ":30", "noon", "12-30", "", "+9:00", "9:+5", "-1:00",
        ];
        for text in garbage {
            assert!(ClockTime::parse(text).is_none(), "{text:?} should not parse");
        }
    }

    #[test]
    fn range_duration_handles_midnight() {
        // ---
        let day = TimeRange::parse("09:00 - 11:00").unwrap();
        assert_eq!(day.duration_minutes(), 120);

        let night = TimeRange::parse("23:00 - 01:00").unwrap();
        assert_eq!(night.duration_minutes(), 120);
        assert_eq!(night.duration_hours(), 2.0);

        let empty = TimeRange::parse("10:00 - 10:00").unwrap();
        assert_eq!(empty.duration_minutes(), 0);
    }

    #[test]
    fn range_requires_spaced_separator() {
        // ---
        assert!(TimeRange::parse("09:00-11:00").is_none());
        assert!(TimeRange::parse("09:00 to 11:00").is_none());
        assert!(TimeRange::parse("09:00 - ").is_none());
        assert!(TimeRange::parse("+9:00 - 10:00").is_none());
    }
}
