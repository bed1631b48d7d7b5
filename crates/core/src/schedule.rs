//! Weekly schedule data model: roster, shift grid, holidays, mutators.
//!
//! The grid is fixed-shape — every (weekday, shift kind) cell always exists
//! and holds a list of entries — so readers never need missing-key checks.
//! All mutators validate before touching state: a failed operation leaves
//! the working week exactly as it was.

use std::fmt;
use std::marker::PhantomData;

use chrono::NaiveDate;
use serde::de::{IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::time::TimeOfDay;

// ---------------------------------------------------------------------------
// Enumerated axes
// ---------------------------------------------------------------------------

/// The five working weekdays, in week order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Full English name, matching the persisted document keys.
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
        }
    }

    pub fn from_name(name: &str) -> Option<Weekday> {
        Weekday::ALL.into_iter().find(|d| d.name() == name)
    }

    /// Index within [`Weekday::ALL`] (Monday = 0).
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Map a calendar date to a working weekday; `None` for weekends.
    pub fn from_date(date: NaiveDate) -> Option<Weekday> {
        use chrono::Datelike;
        match date.weekday() {
            chrono::Weekday::Mon => Some(Weekday::Monday),
            chrono::Weekday::Tue => Some(Weekday::Tuesday),
            chrono::Weekday::Wed => Some(Weekday::Wednesday),
            chrono::Weekday::Thu => Some(Weekday::Thursday),
            chrono::Weekday::Fri => Some(Weekday::Friday),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three fixed daily shift slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShiftKind {
    Morning,
    Afternoon,
    #[serde(rename = "PM Meeting")]
    PmMeeting,
}

impl ShiftKind {
    pub const ALL: [ShiftKind; 3] = [ShiftKind::Morning, ShiftKind::Afternoon, ShiftKind::PmMeeting];

    /// Display name, matching the persisted document keys.
    pub fn name(&self) -> &'static str {
        match self {
            ShiftKind::Morning => "Morning",
            ShiftKind::Afternoon => "Afternoon",
            ShiftKind::PmMeeting => "PM Meeting",
        }
    }

    pub fn from_name(name: &str) -> Option<ShiftKind> {
        ShiftKind::ALL.into_iter().find(|s| s.name() == name)
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ShiftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A member of the staff directory. Names are unique case-insensitively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffMember {
    pub name: String,
    /// Role / status label shown next to the name (e.g. `"Lead"`).
    pub role: String,
    #[serde(default)]
    pub notes: String,
}

/// One time slot within a day+shift cell, shared by one or more staff.
///
/// Invariant: `staff` is never empty — a mutation that would empty it
/// removes the entry instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftEntry {
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub staff: Vec<String>,
}

/// A day marked as a holiday; suppresses all scheduling for that day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

// ---------------------------------------------------------------------------
// DayMap — sparse per-weekday values (holidays, week dates)
// ---------------------------------------------------------------------------

/// A per-weekday map with at most one value per day.
///
/// Serializes as a JSON object keyed by day name, holding only the days
/// that are present. Unknown keys are ignored on read.
#[derive(Debug, Clone, PartialEq)]
pub struct DayMap<T>([Option<T>; 5]);

impl<T> DayMap<T> {
    pub fn get(&self, day: Weekday) -> Option<&T> {
        self.0[day.index()].as_ref()
    }

    pub fn set(&mut self, day: Weekday, value: T) {
        self.0[day.index()] = Some(value);
    }

    /// Remove and return the value for `day`, if any.
    pub fn remove(&mut self, day: Weekday) -> Option<T> {
        self.0[day.index()].take()
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.0[day.index()].is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &T)> {
        Weekday::ALL
            .into_iter()
            .filter_map(|day| self.get(day).map(|v| (day, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl<T> Default for DayMap<T> {
    fn default() -> Self {
        DayMap(std::array::from_fn(|_| None))
    }
}

impl<T: Serialize> Serialize for DayMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (day, value) in self.iter() {
            map.serialize_entry(day.name(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for DayMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DayMapVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for DayMapVisitor<T> {
            type Value = DayMap<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map keyed by weekday name")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = DayMap::default();
                while let Some(key) = access.next_key::<String>()? {
                    match Weekday::from_name(&key) {
                        Some(day) => out.set(day, access.next_value()?),
                        None => {
                            let _: IgnoredAny = access.next_value()?;
                        }
                    }
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(DayMapVisitor(PhantomData))
    }
}

// ---------------------------------------------------------------------------
// Schedule grid
// ---------------------------------------------------------------------------

/// The full week grid: `5 days x 3 shift kinds`, each cell a list of entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schedule {
    days: [DayShifts; 5],
}

#[derive(Debug, Clone, Default, PartialEq)]
struct DayShifts {
    shifts: [Vec<ShiftEntry>; 3],
}

impl Schedule {
    pub fn entries(&self, day: Weekday, kind: ShiftKind) -> &[ShiftEntry] {
        &self.days[day.index()].shifts[kind.index()]
    }

    pub fn entries_mut(&mut self, day: Weekday, kind: ShiftKind) -> &mut Vec<ShiftEntry> {
        &mut self.days[day.index()].shifts[kind.index()]
    }

    /// Drop every entry for `day`, across all shift kinds.
    pub fn clear_day(&mut self, day: Weekday) {
        for shifts in &mut self.days[day.index()].shifts {
            shifts.clear();
        }
    }

    /// Iterate every cell of the grid in (day, kind) order.
    pub fn cells(&self) -> impl Iterator<Item = (Weekday, ShiftKind, &[ShiftEntry])> {
        Weekday::ALL.into_iter().flat_map(move |day| {
            ShiftKind::ALL
                .into_iter()
                .map(move |kind| (day, kind, self.entries(day, kind)))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.cells().all(|(_, _, entries)| entries.is_empty())
    }
}

/// Serde representation of one day's cell map; tolerates missing shift keys
/// the way the historical documents sometimes omitted them.
#[derive(Serialize, Deserialize, Default)]
struct DayShiftsRepr {
    #[serde(rename = "Morning", default)]
    morning: Vec<ShiftEntry>,
    #[serde(rename = "Afternoon", default)]
    afternoon: Vec<ShiftEntry>,
    #[serde(rename = "PM Meeting", default)]
    pm_meeting: Vec<ShiftEntry>,
}

impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(5))?;
        for day in Weekday::ALL {
            let repr = DayShiftsRepr {
                morning: self.entries(day, ShiftKind::Morning).to_vec(),
                afternoon: self.entries(day, ShiftKind::Afternoon).to_vec(),
                pm_meeting: self.entries(day, ShiftKind::PmMeeting).to_vec(),
            };
            map.serialize_entry(day.name(), &repr)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScheduleVisitor;

        impl<'de> Visitor<'de> for ScheduleVisitor {
            type Value = Schedule;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of weekday name to shift-kind lists")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut schedule = Schedule::default();
                while let Some(key) = access.next_key::<String>()? {
                    match Weekday::from_name(&key) {
                        Some(day) => {
                            let repr: DayShiftsRepr = access.next_value()?;
                            *schedule.entries_mut(day, ShiftKind::Morning) = repr.morning;
                            *schedule.entries_mut(day, ShiftKind::Afternoon) = repr.afternoon;
                            *schedule.entries_mut(day, ShiftKind::PmMeeting) = repr.pm_meeting;
                        }
                        None => {
                            let _: IgnoredAny = access.next_value()?;
                        }
                    }
                }
                Ok(schedule)
            }
        }

        deserializer.deserialize_map(ScheduleVisitor)
    }
}

// ---------------------------------------------------------------------------
// Working week
// ---------------------------------------------------------------------------

/// The in-memory working copy: the week currently being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkingWeek {
    pub staff: Vec<StaffMember>,
    pub schedule: Schedule,
    pub holidays: DayMap<Holiday>,
    pub week_dates: DayMap<NaiveDate>,
    pub budget_hours: f64,
}

impl WorkingWeek {
    pub fn is_holiday(&self, day: Weekday) -> bool {
        self.holidays.contains(day)
    }

    /// Case-insensitive roster lookup.
    pub fn find_staff(&self, name: &str) -> Option<&StaffMember> {
        let needle = name.to_lowercase();
        self.staff.iter().find(|s| s.name.to_lowercase() == needle)
    }

    // -- Roster mutators ----------------------------------------------------

    /// Add a member to the staff directory.
    pub fn add_staff_member(
        &mut self,
        name: &str,
        role: &str,
        notes: &str,
    ) -> Result<(), CoreError> {
        let name = name.trim();
        let role = role.trim();
        if name.is_empty() {
            return Err(CoreError::Validation("Staff name must not be empty".into()));
        }
        if role.is_empty() {
            return Err(CoreError::Validation("Staff role must not be empty".into()));
        }
        if self.find_staff(name).is_some() {
            return Err(CoreError::Conflict(format!(
                "Staff member '{name}' already exists"
            )));
        }
        self.staff.push(StaffMember {
            name: name.to_string(),
            role: role.to_string(),
            notes: notes.trim().to_string(),
        });
        Ok(())
    }

    /// Update a member's role and notes.
    pub fn update_staff_member(
        &mut self,
        name: &str,
        role: &str,
        notes: &str,
    ) -> Result<(), CoreError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(CoreError::Validation("Staff role must not be empty".into()));
        }
        let needle = name.to_lowercase();
        let member = self
            .staff
            .iter_mut()
            .find(|s| s.name.to_lowercase() == needle)
            .ok_or_else(|| CoreError::not_found("Staff member", name))?;
        member.role = role.to_string();
        member.notes = notes.trim().to_string();
        Ok(())
    }

    /// Rename a member, rewriting every shift entry that references them.
    pub fn rename_staff_member(&mut self, old: &str, new: &str) -> Result<(), CoreError> {
        let new = new.trim();
        if new.is_empty() {
            return Err(CoreError::Validation("Staff name must not be empty".into()));
        }

        let old_lower = old.to_lowercase();
        let new_lower = new.to_lowercase();

        if self.staff.iter().all(|s| s.name.to_lowercase() != old_lower) {
            return Err(CoreError::not_found("Staff member", old));
        }
        // A collision with any *other* member is a duplicate; renaming a
        // member to a different casing of their own name is allowed.
        if old_lower != new_lower
            && self.staff.iter().any(|s| s.name.to_lowercase() == new_lower)
        {
            return Err(CoreError::Conflict(format!(
                "Staff member '{new}' already exists"
            )));
        }

        let canonical_old = {
            let member = self
                .staff
                .iter_mut()
                .find(|s| s.name.to_lowercase() == old_lower)
                .ok_or_else(|| CoreError::not_found("Staff member", old))?;
            let canonical = member.name.clone();
            member.name = new.to_string();
            canonical
        };

        for day in Weekday::ALL {
            for kind in ShiftKind::ALL {
                for entry in self.schedule.entries_mut(day, kind) {
                    for staff_name in &mut entry.staff {
                        if *staff_name == canonical_old {
                            *staff_name = new.to_string();
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Delete a member and cascade removal across every shift entry.
    pub fn remove_staff_member(&mut self, name: &str) -> Result<(), CoreError> {
        let needle = name.to_lowercase();
        let before = self.staff.len();
        self.staff.retain(|s| s.name.to_lowercase() != needle);
        if self.staff.len() == before {
            return Err(CoreError::not_found("Staff member", name));
        }

        for day in Weekday::ALL {
            for kind in ShiftKind::ALL {
                let entries = self.schedule.entries_mut(day, kind);
                for entry in entries.iter_mut() {
                    entry.staff.retain(|n| n.to_lowercase() != needle);
                }
                // Entries drained of staff are removed, never kept empty.
                entries.retain(|entry| !entry.staff.is_empty());
            }
        }
        Ok(())
    }

    // -- Shift mutators -----------------------------------------------------

    /// Add a time slot with one or more staff to a day+shift cell.
    ///
    /// Merge-on-insert: when an entry with the identical time range already
    /// exists in that cell, the staff are unioned into it (deduplicated)
    /// instead of creating a duplicate slot.
    pub fn add_shift_entry(
        &mut self,
        day: Weekday,
        kind: ShiftKind,
        start: &str,
        end: &str,
        staff: &[String],
    ) -> Result<(), CoreError> {
        if staff.is_empty() {
            return Err(CoreError::Validation(
                "At least one staff member is required".into(),
            ));
        }
        if self.is_holiday(day) {
            return Err(CoreError::Validation(format!(
                "{day} is a holiday; clear the holiday before scheduling staff"
            )));
        }

        let start = TimeOfDay::parse(start)?;
        let end = TimeOfDay::parse(end)?;

        // Resolve every name to its canonical roster spelling up front so a
        // bad name leaves the schedule untouched.
        let mut resolved: Vec<String> = Vec::with_capacity(staff.len());
        for name in staff {
            let member = self
                .find_staff(name)
                .ok_or_else(|| CoreError::not_found("Staff member", name))?;
            if !resolved.contains(&member.name) {
                resolved.push(member.name.clone());
            }
        }

        let entries = self.schedule.entries_mut(day, kind);
        if let Some(existing) = entries
            .iter_mut()
            .find(|e| e.start_time == start && e.end_time == end)
        {
            for name in resolved {
                if !existing.staff.contains(&name) {
                    existing.staff.push(name);
                }
            }
        } else {
            entries.push(ShiftEntry {
                start_time: start,
                end_time: end,
                staff: resolved,
            });
        }
        Ok(())
    }

    /// Remove one staff name from an entry; dropping the entry when it
    /// empties. Removing a name that is not on the entry is a no-op.
    pub fn remove_staff_from_entry(
        &mut self,
        day: Weekday,
        kind: ShiftKind,
        index: usize,
        name: &str,
    ) -> Result<(), CoreError> {
        let entries = self.schedule.entries_mut(day, kind);
        let entry = entries
            .get_mut(index)
            .ok_or_else(|| CoreError::not_found("Shift entry", index))?;

        let needle = name.to_lowercase();
        entry.staff.retain(|n| n.to_lowercase() != needle);
        if entry.staff.is_empty() {
            entries.remove(index);
        }
        Ok(())
    }

    /// Change one staff member's times within an entry.
    ///
    /// A sole occupant is retimed in place; a member sharing the slot is
    /// split out so the other staff's times are not perturbed. Either way
    /// the result is merged into an identical-range entry when one exists.
    pub fn edit_staff_time(
        &mut self,
        day: Weekday,
        kind: ShiftKind,
        index: usize,
        name: &str,
        new_start: &str,
        new_end: &str,
    ) -> Result<(), CoreError> {
        let start = TimeOfDay::parse(new_start)?;
        let end = TimeOfDay::parse(new_end)?;

        let entries = self.schedule.entries_mut(day, kind);
        let entry = entries
            .get_mut(index)
            .ok_or_else(|| CoreError::not_found("Shift entry", index))?;

        let needle = name.to_lowercase();
        let Some(pos) = entry.staff.iter().position(|n| n.to_lowercase() == needle) else {
            return Err(CoreError::not_found("Staff member", name));
        };
        let canonical = entry.staff[pos].clone();

        if entry.staff.len() == 1 {
            entries.remove(index);
        } else {
            entry.staff.remove(pos);
        }

        if let Some(target) = entries
            .iter_mut()
            .find(|e| e.start_time == start && e.end_time == end)
        {
            if !target.staff.contains(&canonical) {
                target.staff.push(canonical);
            }
        } else {
            entries.push(ShiftEntry {
                start_time: start,
                end_time: end,
                staff: vec![canonical],
            });
        }
        Ok(())
    }

    // -- Holiday mutators ---------------------------------------------------

    /// Mark a day as a holiday. Destructive by design: all shift entries
    /// for the day are cleared immediately.
    pub fn set_holiday(
        &mut self,
        day: Weekday,
        label: &str,
        description: &str,
    ) -> Result<(), CoreError> {
        let label = label.trim();
        if label.is_empty() {
            return Err(CoreError::Validation(
                "Holiday label must not be empty".into(),
            ));
        }
        self.holidays.set(
            day,
            Holiday {
                label: label.to_string(),
                description: description.trim().to_string(),
            },
        );
        self.schedule.clear_day(day);
        Ok(())
    }

    /// Remove a holiday. Entries cleared when the holiday was set are NOT
    /// restored; the day comes back empty. Idempotent.
    pub fn clear_holiday(&mut self, day: Weekday) {
        self.holidays.remove(day);
    }

    /// Remove every holiday in the week at once. Same restore semantics as
    /// [`clear_holiday`](Self::clear_holiday): the days come back empty.
    pub fn clear_all_holidays(&mut self) {
        self.holidays = DayMap::default();
    }

    // -- Budget -------------------------------------------------------------

    pub fn set_budget_hours(&mut self, hours: f64) -> Result<(), CoreError> {
        if !hours.is_finite() || hours < 0.0 {
            return Err(CoreError::Validation(format!(
                "Budget hours must be a non-negative number, got {hours}"
            )));
        }
        self.budget_hours = hours;
        Ok(())
    }
}
