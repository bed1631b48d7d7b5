//! Presentation-ready export projection for the printable weekly roster.
//!
//! The PDF/print renderer performs layout only; all business logic lives
//! here. Unlike the on-screen grid, the export groups entries by *actual*
//! start time: a shift stored under Morning but starting at 13:00 prints in
//! the Afternoon block. PM Meeting entries keep their category regardless
//! of time, because it is a meeting type, not a time band.

use chrono::NaiveDate;
use serde::Serialize;

use crate::schedule::{ShiftKind, Weekday, WorkingWeek};
use crate::time::{range_display, TimeOfDay};

/// One staff line within an export shift block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportStaffRow {
    pub name: String,
    pub role: String,
    /// `9:00am - 1:00pm` style display string.
    pub time_display: String,
}

/// One shift block within an export day column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportShiftRow {
    pub shift: ShiftKind,
    pub staff_rows: Vec<ExportStaffRow>,
}

/// One day column of the export grid.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDay {
    pub day: Weekday,
    pub date: Option<NaiveDate>,
    pub is_holiday: bool,
    pub holiday_label: Option<String>,
    pub shift_rows: Vec<ExportShiftRow>,
    pub hours: f64,
}

/// Totals footer for the export.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportTotals {
    pub weekly_hours: f64,
    pub budget_hours: f64,
    pub budget_remaining: f64,
}

/// The complete export model handed to the layout renderer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportModel {
    pub days: Vec<ExportDay>,
    pub totals: ExportTotals,
}

/// Classify a start time into its printed shift band:
/// 05:00-11:59 Morning, 12:00-16:59 Afternoon, everything else PM Meeting.
pub fn shift_band(start: TimeOfDay) -> ShiftKind {
    match start.hour() {
        5..=11 => ShiftKind::Morning,
        12..=16 => ShiftKind::Afternoon,
        _ => ShiftKind::PmMeeting,
    }
}

impl WorkingWeek {
    /// Build the export projection from the current working state.
    pub fn build_export_model(&self) -> ExportModel {
        let days = Weekday::ALL
            .into_iter()
            .map(|day| {
                let holiday = self.holidays.get(day);
                ExportDay {
                    day,
                    date: self.week_dates.get(day).copied(),
                    is_holiday: holiday.is_some(),
                    holiday_label: holiday.map(|h| h.label.clone()),
                    shift_rows: self.export_shift_rows(day),
                    hours: self.daily_hours(day),
                }
            })
            .collect();

        ExportModel {
            days,
            totals: ExportTotals {
                weekly_hours: self.weekly_hours(),
                budget_hours: self.budget_hours,
                budget_remaining: self.budget_remaining(),
            },
        }
    }

    fn export_shift_rows(&self, day: Weekday) -> Vec<ExportShiftRow> {
        // Holiday days print empty blocks even when a document predating
        // the clear-on-holiday rule still carries entries under them.
        if self.is_holiday(day) {
            return ShiftKind::ALL
                .into_iter()
                .map(|kind| ExportShiftRow {
                    shift: kind,
                    staff_rows: Vec::new(),
                })
                .collect();
        }

        let mut buckets: [Vec<ExportStaffRow>; 3] = std::array::from_fn(|_| Vec::new());

        for stored_kind in ShiftKind::ALL {
            for entry in self.schedule.entries(day, stored_kind) {
                // PM Meeting keeps its category; Morning/Afternoon are
                // regrouped by where the entry actually starts.
                let printed_kind = match stored_kind {
                    ShiftKind::PmMeeting => ShiftKind::PmMeeting,
                    _ => shift_band(entry.start_time),
                };
                let time_display = range_display(entry.start_time, entry.end_time);
                for name in &entry.staff {
                    let role = self
                        .find_staff(name)
                        .map(|m| m.role.clone())
                        .unwrap_or_default();
                    buckets[printed_kind as usize].push(ExportStaffRow {
                        name: name.clone(),
                        role,
                        time_display: time_display.clone(),
                    });
                }
            }
        }

        // Earliest start first within each block for a stable printout.
        ShiftKind::ALL
            .into_iter()
            .map(|kind| {
                let mut staff_rows = std::mem::take(&mut buckets[kind as usize]);
                staff_rows.sort_by(|a, b| {
                    a.time_display
                        .cmp(&b.time_display)
                        .then_with(|| a.name.cmp(&b.name))
                });
                ExportShiftRow { shift: kind, staff_rows }
            })
            .collect()
    }
}
