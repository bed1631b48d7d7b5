//! Week template collection and the active working copy.
//!
//! A template is a saved, named week configuration (staff + schedule +
//! holidays + budget). At most one template is active; the working copy is
//! a deep copy of it, so edits never touch storage until a save. Deleting
//! the active template reverts to an unconfigured state rather than
//! auto-loading another.

use chrono::{Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::schedule::{DayMap, Holiday, Schedule, StaffMember, Weekday, WorkingWeek};
use crate::types::{TemplateId, Timestamp};

/// A stored week configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTemplate {
    pub id: TemplateId,
    /// Optional display name; empty for plain date-range templates.
    #[serde(default)]
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// The calendar date of each weekday that falls inside the range.
    /// Partial weeks hold fewer than five days.
    pub week_dates: DayMap<NaiveDate>,
    pub staff: Vec<StaffMember>,
    pub schedule: Schedule,
    pub holidays: DayMap<Holiday>,
    pub budget_hours: f64,
    /// Whole-range holiday templates (e.g. winter break) pre-mark every
    /// in-range weekday as a holiday.
    #[serde(default)]
    pub is_holiday_period: bool,
    pub created_at: Timestamp,
    pub last_modified: Timestamp,
}

/// Parameters for creating a new template.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTemplate {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub name: Option<String>,
    pub budget_hours: f64,
    #[serde(default)]
    pub is_holiday_period: bool,
}

/// The template collection plus the active working copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateManager {
    templates: Vec<WeekTemplate>,
    active_id: Option<TemplateId>,
    working: WorkingWeek,
}

impl TemplateManager {
    pub fn new(
        templates: Vec<WeekTemplate>,
        active_id: Option<TemplateId>,
        working: WorkingWeek,
    ) -> Self {
        Self {
            templates,
            active_id,
            working,
        }
    }

    pub fn templates(&self) -> &[WeekTemplate] {
        &self.templates
    }

    pub fn active_id(&self) -> Option<TemplateId> {
        self.active_id
    }

    pub fn working(&self) -> &WorkingWeek {
        &self.working
    }

    /// Mutable access to the working copy for the schedule mutators.
    pub fn working_mut(&mut self) -> &mut WorkingWeek {
        &mut self.working
    }

    fn find(&self, id: TemplateId) -> Option<&WeekTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    fn find_mut(&mut self, id: TemplateId) -> Option<&mut WeekTemplate> {
        self.templates.iter_mut().find(|t| t.id == id)
    }

    /// Create a new template, make it active, and reset the working copy
    /// to it. The previous working copy is first saved into its template.
    pub fn create(&mut self, spec: NewTemplate) -> Result<TemplateId, CoreError> {
        if spec.end_date <= spec.start_date {
            return Err(CoreError::Validation(format!(
                "End date {} must be after start date {}",
                spec.end_date, spec.start_date
            )));
        }
        if !spec.budget_hours.is_finite() || spec.budget_hours <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Budget hours must be positive, got {}",
                spec.budget_hours
            )));
        }

        let week_dates = work_week_dates(spec.start_date, spec.end_date);
        if week_dates.is_empty() {
            return Err(CoreError::Validation(
                "Date range contains no weekdays".into(),
            ));
        }

        if self
            .templates
            .iter()
            .any(|t| t.start_date == spec.start_date && t.end_date == spec.end_date)
        {
            return Err(CoreError::Conflict(format!(
                "A template for {} - {} already exists",
                spec.start_date, spec.end_date
            )));
        }

        let name = spec.name.unwrap_or_default().trim().to_string();
        if spec.is_holiday_period && name.is_empty() {
            return Err(CoreError::Validation(
                "Holiday-period templates require a name".into(),
            ));
        }

        // Keep the outgoing working copy; creation must not discard edits.
        if let Some(active) = self.active_id {
            self.save(Some(active))?;
        }

        let mut holidays = DayMap::default();
        if spec.is_holiday_period {
            for (day, _) in week_dates.iter() {
                holidays.set(
                    day,
                    Holiday {
                        label: name.clone(),
                        description: format!(
                            "Holiday period: {} to {}",
                            spec.start_date, spec.end_date
                        ),
                    },
                );
            }
        }

        let id = self.templates.iter().map(|t| t.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let template = WeekTemplate {
            id,
            name,
            start_date: spec.start_date,
            end_date: spec.end_date,
            week_dates,
            staff: Vec::new(),
            schedule: Schedule::default(),
            holidays,
            budget_hours: spec.budget_hours,
            is_holiday_period: spec.is_holiday_period,
            created_at: now,
            last_modified: now,
        };

        self.working = working_copy_of(&template);
        self.templates.push(template);
        // Most recent first, matching the manager list view.
        self.templates
            .sort_by(|a, b| b.start_date.cmp(&a.start_date));
        self.active_id = Some(id);
        Ok(id)
    }

    /// Make `id` the active template. The current working copy is saved
    /// into its own template first, then the target is deep-copied in.
    /// Saving first also applies when `id` is already active: a reload
    /// round-trips unsaved edits through the stored template instead of
    /// discarding them.
    pub fn load(&mut self, id: TemplateId) -> Result<(), CoreError> {
        if self.find(id).is_none() {
            return Err(CoreError::not_found("Template", id));
        }
        if let Some(active) = self.active_id {
            self.save(Some(active))?;
        }
        let template = self
            .find(id)
            .ok_or_else(|| CoreError::not_found("Template", id))?;
        self.working = working_copy_of(template);
        self.active_id = Some(id);
        Ok(())
    }

    /// Persist the working copy into the stored template at `id`
    /// (default: the active one).
    pub fn save(&mut self, id: Option<TemplateId>) -> Result<(), CoreError> {
        let id = id.or(self.active_id).ok_or_else(|| {
            CoreError::Validation("No active template to save into".into())
        })?;
        let working = self.working.clone();
        let template = self
            .find_mut(id)
            .ok_or_else(|| CoreError::not_found("Template", id))?;
        template.staff = working.staff;
        template.schedule = working.schedule;
        template.holidays = working.holidays;
        template.budget_hours = working.budget_hours;
        template.last_modified = Utc::now();
        Ok(())
    }

    /// Change the stored budget of template `id` without loading it.
    /// When `id` happens to be the active template the working copy's
    /// budget is updated too, so the open week reflects the new figure.
    pub fn set_template_budget(
        &mut self,
        id: TemplateId,
        hours: f64,
    ) -> Result<(), CoreError> {
        if !hours.is_finite() || hours <= 0.0 {
            return Err(CoreError::Validation(format!(
                "Budget hours must be positive, got {hours}"
            )));
        }
        let template = self
            .find_mut(id)
            .ok_or_else(|| CoreError::not_found("Template", id))?;
        template.budget_hours = hours;
        template.last_modified = Utc::now();
        if self.active_id == Some(id) {
            self.working.budget_hours = hours;
        }
        Ok(())
    }

    /// Delete a stored template. Deleting the active one clears the
    /// selection and resets the working copy to empty — the caller is in
    /// an unconfigured state until they load or create another template.
    pub fn delete(&mut self, id: TemplateId) -> Result<(), CoreError> {
        let before = self.templates.len();
        self.templates.retain(|t| t.id != id);
        if self.templates.len() == before {
            return Err(CoreError::not_found("Template", id));
        }
        if self.active_id == Some(id) {
            self.active_id = None;
            self.working = WorkingWeek::default();
        }
        Ok(())
    }
}

/// Deep-copy a template into a fresh working copy.
fn working_copy_of(template: &WeekTemplate) -> WorkingWeek {
    WorkingWeek {
        staff: template.staff.clone(),
        schedule: template.schedule.clone(),
        holidays: template.holidays.clone(),
        week_dates: template.week_dates.clone(),
        budget_hours: template.budget_hours,
    }
}

/// The calendar date of each Monday-Friday weekday within `start..=end`.
/// When the range spans more than one week the latest occurrence wins.
fn work_week_dates(start: NaiveDate, end: NaiveDate) -> DayMap<NaiveDate> {
    let mut dates = DayMap::default();
    let mut current = start;
    while current <= end {
        if let Some(day) = Weekday::from_date(current) {
            dates.set(day, current);
        }
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::schedule::ShiftKind;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec(start: NaiveDate, end: NaiveDate) -> NewTemplate {
        NewTemplate {
            start_date: start,
            end_date: end,
            name: None,
            budget_hours: 40.0,
            is_holiday_period: false,
        }
    }

    // 2024-01-01 is a Monday.
    fn january_week() -> NewTemplate {
        spec(date(2024, 1, 1), date(2024, 1, 5))
    }

    #[test]
    fn create_populates_week_dates() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        assert_eq!(mgr.active_id(), Some(id));
        let working = mgr.working();
        assert_eq!(working.week_dates.get(Weekday::Monday), Some(&date(2024, 1, 1)));
        assert_eq!(working.week_dates.get(Weekday::Friday), Some(&date(2024, 1, 5)));
        assert_eq!(working.budget_hours, 40.0);
        assert!(working.staff.is_empty());
    }

    #[test]
    fn create_allows_partial_weeks() {
        let mut mgr = TemplateManager::default();
        // Wednesday to Thursday only.
        mgr.create(spec(date(2024, 1, 3), date(2024, 1, 4))).unwrap();
        let dates = &mgr.working().week_dates;
        assert!(dates.get(Weekday::Monday).is_none());
        assert!(dates.get(Weekday::Wednesday).is_some());
        assert!(dates.get(Weekday::Thursday).is_some());
        assert!(dates.get(Weekday::Friday).is_none());
    }

    #[test]
    fn create_rejects_inverted_range() {
        let mut mgr = TemplateManager::default();
        assert_matches!(
            mgr.create(spec(date(2024, 1, 5), date(2024, 1, 1))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn create_rejects_non_positive_budget() {
        let mut mgr = TemplateManager::default();
        let mut s = january_week();
        s.budget_hours = 0.0;
        assert_matches!(mgr.create(s), Err(CoreError::Validation(_)));
    }

    #[test]
    fn create_rejects_weekend_only_range() {
        let mut mgr = TemplateManager::default();
        // 2024-01-06/07 is a Saturday/Sunday.
        assert_matches!(
            mgr.create(spec(date(2024, 1, 6), date(2024, 1, 7))),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn create_rejects_duplicate_date_range() {
        let mut mgr = TemplateManager::default();
        mgr.create(january_week()).unwrap();
        assert_matches!(mgr.create(january_week()), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn holiday_period_premarks_every_weekday() {
        let mut mgr = TemplateManager::default();
        let mut s = january_week();
        s.name = Some("Winter break".into());
        s.is_holiday_period = true;
        mgr.create(s).unwrap();

        for day in Weekday::ALL {
            let holiday = mgr.working().holidays.get(day).unwrap();
            assert_eq!(holiday.label, "Winter break");
        }
    }

    #[test]
    fn holiday_period_requires_name() {
        let mut mgr = TemplateManager::default();
        let mut s = january_week();
        s.is_holiday_period = true;
        assert_matches!(mgr.create(s), Err(CoreError::Validation(_)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        mgr.working_mut().add_staff_member("Alice", "Lead", "").unwrap();
        mgr.working_mut()
            .add_shift_entry(Weekday::Monday, ShiftKind::Morning, "09:00", "13:00", &["Alice".into()])
            .unwrap();
        mgr.save(None).unwrap();

        let snapshot = mgr.working().clone();
        mgr.load(id).unwrap();
        assert_eq!(mgr.working(), &snapshot);
        assert_eq!(mgr.active_id(), Some(id));
    }

    #[test]
    fn save_without_active_template_fails() {
        let mut mgr = TemplateManager::default();
        assert_matches!(mgr.save(None), Err(CoreError::Validation(_)));
    }

    #[test]
    fn load_saves_outgoing_working_copy() {
        let mut mgr = TemplateManager::default();
        let first = mgr.create(january_week()).unwrap();
        let second = mgr.create(spec(date(2024, 1, 8), date(2024, 1, 12))).unwrap();

        // Edit the working copy of `second`, then switch away without an
        // explicit save.
        mgr.working_mut().add_staff_member("Alice", "Lead", "").unwrap();
        mgr.load(first).unwrap();
        assert!(mgr.working().staff.is_empty());

        // The edit was persisted into `second` before switching.
        mgr.load(second).unwrap();
        assert_eq!(mgr.working().staff.len(), 1);
    }

    #[test]
    fn reload_active_template_keeps_unsaved_edits() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        mgr.working_mut().add_staff_member("Alice", "Lead", "").unwrap();
        mgr.load(id).unwrap();

        // The reload saved the edit into the template before copying it
        // back out, so nothing was lost.
        assert_eq!(mgr.working().staff.len(), 1);
        assert_eq!(mgr.find(id).unwrap().staff.len(), 1);
    }

    #[test]
    fn working_copy_is_isolated_until_save() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        mgr.working_mut().add_staff_member("Alice", "Lead", "").unwrap();

        // The stored template is untouched until an explicit save.
        let stored = mgr.find(id).unwrap();
        assert!(stored.staff.is_empty());

        mgr.save(None).unwrap();
        let stored = mgr.find(id).unwrap();
        assert_eq!(stored.staff.len(), 1);
    }

    #[test]
    fn load_unknown_template_fails() {
        let mut mgr = TemplateManager::default();
        assert_matches!(mgr.load(99), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn delete_active_reverts_to_unconfigured() {
        let mut mgr = TemplateManager::default();
        let first = mgr.create(january_week()).unwrap();
        mgr.create(spec(date(2024, 1, 8), date(2024, 1, 12))).unwrap();
        let second = mgr.active_id().unwrap();

        mgr.delete(second).unwrap();

        // No auto-load of the remaining template.
        assert_eq!(mgr.active_id(), None);
        assert_eq!(mgr.working(), &WorkingWeek::default());
        assert!(mgr.find(first).is_some());
    }

    #[test]
    fn delete_inactive_keeps_working_copy() {
        let mut mgr = TemplateManager::default();
        let first = mgr.create(january_week()).unwrap();
        let second = mgr.create(spec(date(2024, 1, 8), date(2024, 1, 12))).unwrap();

        mgr.delete(first).unwrap();
        assert_eq!(mgr.active_id(), Some(second));
        assert_eq!(mgr.templates().len(), 1);
    }

    #[test]
    fn delete_unknown_template_fails() {
        let mut mgr = TemplateManager::default();
        assert_matches!(mgr.delete(7), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn set_template_budget_edits_an_inactive_template_in_place() {
        let mut mgr = TemplateManager::default();
        let first = mgr.create(january_week()).unwrap();
        mgr.create(spec(date(2024, 1, 8), date(2024, 1, 12))).unwrap();

        mgr.set_template_budget(first, 55.0).unwrap();

        assert_eq!(mgr.find(first).unwrap().budget_hours, 55.0);
        // The active working copy belongs to the second template and keeps
        // its own budget.
        assert_eq!(mgr.working().budget_hours, 40.0);
    }

    #[test]
    fn set_template_budget_on_active_syncs_working_copy() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        mgr.set_template_budget(id, 32.5).unwrap();

        assert_eq!(mgr.find(id).unwrap().budget_hours, 32.5);
        assert_eq!(mgr.working().budget_hours, 32.5);
    }

    #[test]
    fn set_template_budget_rejects_non_positive_values() {
        let mut mgr = TemplateManager::default();
        let id = mgr.create(january_week()).unwrap();

        assert_matches!(mgr.set_template_budget(id, 0.0), Err(CoreError::Validation(_)));
        assert_matches!(mgr.set_template_budget(id, f64::NAN), Err(CoreError::Validation(_)));
        assert_eq!(mgr.find(id).unwrap().budget_hours, 40.0);
    }

    #[test]
    fn set_template_budget_unknown_template_fails() {
        let mut mgr = TemplateManager::default();
        assert_matches!(mgr.set_template_budget(9, 40.0), Err(CoreError::NotFound { .. }));
    }

    #[test]
    fn templates_sorted_most_recent_first() {
        let mut mgr = TemplateManager::default();
        mgr.create(january_week()).unwrap();
        mgr.create(spec(date(2024, 1, 8), date(2024, 1, 12))).unwrap();

        let starts: Vec<NaiveDate> = mgr.templates().iter().map(|t| t.start_date).collect();
        assert_eq!(starts, vec![date(2024, 1, 8), date(2024, 1, 1)]);
    }
}
