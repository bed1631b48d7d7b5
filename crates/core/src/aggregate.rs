//! Hour aggregation over the working week.
//!
//! Totals are *labor hours*: an entry's duration multiplied by the number of
//! staff sharing it, i.e. total paid hours rather than wall-clock coverage.
//! Everything here is a pure read — cardinalities are tiny (tens of staff,
//! 5 days, 3 shift kinds) so recomputing per render is fine.

use chrono::NaiveDate;
use serde::Serialize;

use crate::schedule::{ShiftKind, Weekday, WorkingWeek};
use crate::time::{duration_hours, range_display};

/// One scheduled slot in a staff member's weekly breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffShiftDetail {
    pub shift: ShiftKind,
    pub hours: f64,
    /// `9:00am - 1:00pm` style display string.
    pub time_display: String,
}

/// A staff member's hours for one day. Only days with hours appear.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffDayHours {
    pub day: Weekday,
    pub hours: f64,
    pub entries: Vec<StaffShiftDetail>,
}

/// A staff member's full weekly breakdown.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffWeekSummary {
    pub per_day: Vec<StaffDayHours>,
    pub total: f64,
}

/// One roster row in the weekly leaderboard, sorted by hours descending.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffHoursRow {
    pub name: String,
    pub role: String,
    pub hours: f64,
}

/// Per-day line of the week summary.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub day: Weekday,
    pub date: Option<NaiveDate>,
    pub is_holiday: bool,
    pub holiday_label: Option<String>,
    pub hours: f64,
}

/// The whole-week roll-up shown by the summary view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekSummary {
    pub weekly_hours: f64,
    pub budget_hours: f64,
    pub budget_remaining: f64,
    pub days: Vec<DaySummary>,
    pub staff: Vec<StaffHoursRow>,
}

impl WorkingWeek {
    /// Labor hours scheduled for one day. A holiday contributes zero
    /// regardless of any entries.
    pub fn daily_hours(&self, day: Weekday) -> f64 {
        if self.is_holiday(day) {
            return 0.0;
        }
        ShiftKind::ALL
            .into_iter()
            .flat_map(|kind| self.schedule.entries(day, kind))
            .map(|entry| {
                duration_hours(entry.start_time, entry.end_time) * entry.staff.len() as f64
            })
            .sum()
    }

    /// Labor hours scheduled across the whole week.
    pub fn weekly_hours(&self) -> f64 {
        Weekday::ALL.into_iter().map(|day| self.daily_hours(day)).sum()
    }

    /// Budget minus scheduled hours. Negative means over budget; no clamp.
    pub fn budget_remaining(&self) -> f64 {
        self.budget_hours - self.weekly_hours()
    }

    /// Weekly breakdown for one staff member, matched case-insensitively.
    /// Only days where they have hours are included.
    pub fn staff_weekly_hours(&self, name: &str) -> StaffWeekSummary {
        let needle = name.to_lowercase();
        let mut per_day = Vec::new();
        let mut total = 0.0;

        for day in Weekday::ALL {
            // A document that predates the clear-on-holiday rule can carry
            // both a holiday and entries; holidays win, as in daily_hours.
            if self.is_holiday(day) {
                continue;
            }
            let mut day_hours = 0.0;
            let mut entries = Vec::new();

            for kind in ShiftKind::ALL {
                for entry in self.schedule.entries(day, kind) {
                    if entry.staff.iter().any(|n| n.to_lowercase() == needle) {
                        let hours = duration_hours(entry.start_time, entry.end_time);
                        day_hours += hours;
                        entries.push(StaffShiftDetail {
                            shift: kind,
                            hours,
                            time_display: range_display(entry.start_time, entry.end_time),
                        });
                    }
                }
            }

            if day_hours > 0.0 {
                total += day_hours;
                per_day.push(StaffDayHours {
                    day,
                    hours: day_hours,
                    entries,
                });
            }
        }

        StaffWeekSummary { per_day, total }
    }

    /// Roster members with non-zero hours, most hours first.
    pub fn staff_leaderboard(&self) -> Vec<StaffHoursRow> {
        let mut rows: Vec<StaffHoursRow> = self
            .staff
            .iter()
            .filter_map(|member| {
                let hours = self.staff_weekly_hours(&member.name).total;
                (hours > 0.0).then(|| StaffHoursRow {
                    name: member.name.clone(),
                    role: member.role.clone(),
                    hours,
                })
            })
            .collect();
        rows.sort_by(|a, b| b.hours.total_cmp(&a.hours).then_with(|| a.name.cmp(&b.name)));
        rows
    }

    /// Roll everything up for the summary view.
    pub fn week_summary(&self) -> WeekSummary {
        let days = Weekday::ALL
            .into_iter()
            .map(|day| DaySummary {
                day,
                date: self.week_dates.get(day).copied(),
                is_holiday: self.is_holiday(day),
                holiday_label: self.holidays.get(day).map(|h| h.label.clone()),
                hours: self.daily_hours(day),
            })
            .collect();

        WeekSummary {
            weekly_hours: self.weekly_hours(),
            budget_hours: self.budget_hours,
            budget_remaining: self.budget_remaining(),
            days,
            staff: self.staff_leaderboard(),
        }
    }
}
