//! Time-of-day arithmetic and display formatting.
//!
//! Shift times are wall-clock `HH:MM` values with no date or timezone
//! attached. Internally they are minutes since midnight so hour math is
//! plain integer arithmetic. All functions here are pure.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};

use crate::error::CoreError;

/// Minutes in a full day.
const MINUTES_PER_DAY: u32 = 24 * 60;

/// 12-hour display style: `9:00am` vs `9:00AM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock12 {
    Lower,
    Upper,
}

/// A wall-clock time of day, stored as minutes since midnight.
///
/// Serializes as the `HH:MM` string the persisted document uses, so the
/// in-memory model and the wire format share one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay {
    minutes: u32,
}

impl TimeOfDay {
    /// Parse an `HH:MM` string (1-2 digit hour, exactly 2-digit minute).
    ///
    /// Hour must be 0-23 and minute 0-59; anything else fails with
    /// [`CoreError::Validation`].
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::Validation(format!("Invalid time format: '{input}'"));

        let (hour_part, minute_part) = input.split_once(':').ok_or_else(invalid)?;
        if hour_part.is_empty()
            || hour_part.len() > 2
            || minute_part.len() != 2
            || !hour_part.bytes().all(|b| b.is_ascii_digit())
            || !minute_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let hour: u32 = hour_part.parse().map_err(|_| invalid())?;
        let minute: u32 = minute_part.parse().map_err(|_| invalid())?;
        if hour > 23 || minute > 59 {
            return Err(invalid());
        }

        Ok(Self {
            minutes: hour * 60 + minute,
        })
    }

    /// Construct from a raw minute-of-day value (0..1440).
    pub fn from_minutes(minutes: u32) -> Result<Self, CoreError> {
        if minutes >= MINUTES_PER_DAY {
            return Err(CoreError::Validation(format!(
                "Minute-of-day out of range: {minutes}"
            )));
        }
        Ok(Self { minutes })
    }

    /// Minutes since midnight.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Hour component (0-23).
    pub fn hour(&self) -> u32 {
        self.minutes / 60
    }

    /// The canonical zero-padded `HH:MM` form used for persistence.
    pub fn to_hhmm(&self) -> String {
        format!("{:02}:{:02}", self.minutes / 60, self.minutes % 60)
    }

    /// Render on a 12-hour clock: midnight and noon both show as 12,
    /// minutes are zero-padded, meridiem per `style`.
    pub fn format_12h(&self, style: Clock12) -> String {
        let hour = self.hour();
        let minute = self.minutes % 60;
        let meridiem = match (hour >= 12, style) {
            (false, Clock12::Lower) => "am",
            (false, Clock12::Upper) => "AM",
            (true, Clock12::Lower) => "pm",
            (true, Clock12::Upper) => "PM",
        };
        let display_hour = match hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{display_hour}:{minute:02}{meridiem}")
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hhmm())
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hhmm())
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TimeOfDay::parse(&raw).map_err(de::Error::custom)
    }
}

/// Duration between two times in fractional hours.
///
/// When `end` is lexically before `start` the interval wraps past midnight
/// (an overnight shift), so the result is never negative. `end == start`
/// yields zero, not 24 hours.
pub fn duration_hours(start: TimeOfDay, end: TimeOfDay) -> f64 {
    let mut total_minutes = end.minutes as i64 - start.minutes as i64;
    if total_minutes < 0 {
        total_minutes += MINUTES_PER_DAY as i64;
    }
    total_minutes as f64 / 60.0
}

/// `9:00am - 1:00pm` style range display used by tiles and the export grid.
pub fn range_display(start: TimeOfDay, end: TimeOfDay) -> String {
    format!(
        "{} - {}",
        start.format_12h(Clock12::Lower),
        end.format_12h(Clock12::Lower)
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::error::CoreError;

    // -----------------------------------------------------------------------
    // Parsing
    // -----------------------------------------------------------------------

    #[test]
    fn parse_zero_padded() {
        let t = TimeOfDay::parse("09:30").unwrap();
        assert_eq!(t.minutes(), 9 * 60 + 30);
    }

    #[test]
    fn parse_single_digit_hour() {
        let t = TimeOfDay::parse("9:05").unwrap();
        assert_eq!(t.minutes(), 9 * 60 + 5);
    }

    #[test]
    fn parse_midnight() {
        assert_eq!(TimeOfDay::parse("00:00").unwrap().minutes(), 0);
    }

    #[test]
    fn parse_last_minute_of_day() {
        assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn parse_rejects_hour_out_of_range() {
        assert_matches!(TimeOfDay::parse("24:00"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_minute_out_of_range() {
        assert_matches!(TimeOfDay::parse("12:60"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_missing_colon() {
        assert_matches!(TimeOfDay::parse("1230"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_one_digit_minute() {
        assert_matches!(TimeOfDay::parse("12:3"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_matches!(TimeOfDay::parse("noon"), Err(CoreError::Validation(_)));
        assert_matches!(TimeOfDay::parse(""), Err(CoreError::Validation(_)));
        assert_matches!(TimeOfDay::parse("-1:00"), Err(CoreError::Validation(_)));
    }

    // -----------------------------------------------------------------------
    // Duration
    // -----------------------------------------------------------------------

    #[test]
    fn duration_simple_shift() {
        let start = TimeOfDay::parse("09:00").unwrap();
        let end = TimeOfDay::parse("13:00").unwrap();
        assert_eq!(duration_hours(start, end), 4.0);
    }

    #[test]
    fn duration_half_hours() {
        let start = TimeOfDay::parse("09:15").unwrap();
        let end = TimeOfDay::parse("17:45").unwrap();
        assert_eq!(duration_hours(start, end), 8.5);
    }

    #[test]
    fn duration_overnight_wraps() {
        let start = TimeOfDay::parse("23:00").unwrap();
        let end = TimeOfDay::parse("01:00").unwrap();
        assert_eq!(duration_hours(start, end), 2.0);
    }

    #[test]
    fn duration_identical_times_is_zero() {
        let t = TimeOfDay::parse("12:00").unwrap();
        assert_eq!(duration_hours(t, t), 0.0);
    }

    #[test]
    fn duration_never_negative_over_all_pairs() {
        // Spot-check a coarse grid of start/end pairs rather than the full
        // 1440x1440 product.
        for start in (0..MINUTES_PER_DAY).step_by(97) {
            for end in (0..MINUTES_PER_DAY).step_by(89) {
                let s = TimeOfDay::from_minutes(start).unwrap();
                let e = TimeOfDay::from_minutes(end).unwrap();
                assert!(duration_hours(s, e) >= 0.0);
            }
        }
    }

    // -----------------------------------------------------------------------
    // 12-hour display
    // -----------------------------------------------------------------------

    #[test]
    fn format_midnight_is_12am() {
        let t = TimeOfDay::parse("00:00").unwrap();
        assert_eq!(t.format_12h(Clock12::Lower), "12:00am");
    }

    #[test]
    fn format_noon_is_12pm() {
        let t = TimeOfDay::parse("12:00").unwrap();
        assert_eq!(t.format_12h(Clock12::Lower), "12:00pm");
    }

    #[test]
    fn format_afternoon() {
        let t = TimeOfDay::parse("13:30").unwrap();
        assert_eq!(t.format_12h(Clock12::Lower), "1:30pm");
    }

    #[test]
    fn format_upper_style() {
        let t = TimeOfDay::parse("13:30").unwrap();
        assert_eq!(t.format_12h(Clock12::Upper), "1:30PM");
    }

    #[test]
    fn format_total_over_every_minute_of_day() {
        // Every one of the 1440 minute-of-day values must render without
        // panicking and with a sane shape.
        for minutes in 0..MINUTES_PER_DAY {
            let t = TimeOfDay::from_minutes(minutes).unwrap();
            let rendered = t.format_12h(Clock12::Lower);
            assert!(rendered.ends_with("am") || rendered.ends_with("pm"));
            assert!(rendered.contains(':'));
        }
    }

    #[test]
    fn range_display_spans_meridiem() {
        let start = TimeOfDay::parse("09:00").unwrap();
        let end = TimeOfDay::parse("13:00").unwrap();
        assert_eq!(range_display(start, end), "9:00am - 1:00pm");
    }

    // -----------------------------------------------------------------------
    // Serde round-trip
    // -----------------------------------------------------------------------

    #[test]
    fn serializes_as_hhmm_string() {
        let t = TimeOfDay::parse("9:05").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"09:05\"");
    }

    #[test]
    fn deserializes_from_hhmm_string() {
        let t: TimeOfDay = serde_json::from_str("\"17:45\"").unwrap();
        assert_eq!(t.to_hhmm(), "17:45");
    }

    #[test]
    fn deserialize_rejects_invalid_time() {
        let result: Result<TimeOfDay, _> = serde_json::from_str("\"25:00\"");
        assert!(result.is_err());
    }
}
