//! The persisted state document and the gateway that stores it.
//!
//! One document holds a user's entire state: the working copy, the template
//! collection, and the active-template pointer. Stores are replace-whole-
//! document — `save` overwrites, never patches — so any store speaking this
//! shape (Postgres, a local snapshot file) can seed the in-memory model
//! interchangeably.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::schedule::{DayMap, Holiday, Schedule, StaffMember, WorkingWeek};
use crate::template::{TemplateManager, WeekTemplate};
use crate::types::TemplateId;

/// The whole-state document as persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleDocument {
    pub staff: Vec<StaffMember>,
    pub schedule: Schedule,
    pub holidays: DayMap<Holiday>,
    pub week_dates: DayMap<NaiveDate>,
    pub budget_hours: f64,
    pub active_template_id: Option<TemplateId>,
    pub templates: Vec<WeekTemplate>,
}

impl ScheduleDocument {
    /// Snapshot the manager's full state into a document.
    pub fn from_manager(manager: &TemplateManager) -> Self {
        let working = manager.working();
        Self {
            staff: working.staff.clone(),
            schedule: working.schedule.clone(),
            holidays: working.holidays.clone(),
            week_dates: working.week_dates.clone(),
            budget_hours: working.budget_hours,
            active_template_id: manager.active_id(),
            templates: manager.templates().to_vec(),
        }
    }

    /// Rebuild a manager from a stored document.
    ///
    /// A dangling `active_template_id` (template deleted by an older
    /// client variant) is treated as no selection rather than an error.
    pub fn into_manager(self) -> TemplateManager {
        let active_id = self
            .active_template_id
            .filter(|id| self.templates.iter().any(|t| t.id == *id));
        let working = WorkingWeek {
            staff: self.staff,
            schedule: self.schedule,
            holidays: self.holidays,
            week_dates: self.week_dates,
            budget_hours: self.budget_hours,
        };
        TemplateManager::new(self.templates, active_id, working)
    }
}

/// Errors a persistence gateway can surface to the session layer.
///
/// `Unauthorized` invalidates the session (force re-login); `Unavailable`
/// on save is logged and superseded by the next save, and on load falls
/// back to empty defaults.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("store rejected the session credential")]
    Unauthorized,

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Whole-document persistence, injected into the session layer.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Fetch the last stored document; `None` when the user has never
    /// saved anything.
    async fn load(&self) -> Result<Option<ScheduleDocument>, GatewayError>;

    /// Replace the stored document. Idempotent.
    async fn save(&self, document: &ScheduleDocument) -> Result<(), GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{ShiftKind, Weekday};
    use crate::template::NewTemplate;

    fn populated_manager() -> TemplateManager {
        let mut mgr = TemplateManager::default();
        mgr.create(NewTemplate {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            name: None,
            budget_hours: 40.0,
            is_holiday_period: false,
        })
        .unwrap();
        mgr.working_mut().add_staff_member("Alice", "Lead", "").unwrap();
        mgr.working_mut()
            .add_shift_entry(Weekday::Monday, ShiftKind::Morning, "09:00", "13:00", &["Alice".into()])
            .unwrap();
        mgr.working_mut().set_holiday(Weekday::Friday, "Inset day", "").unwrap();
        mgr
    }

    #[test]
    fn document_round_trips_manager_state() {
        let mgr = populated_manager();
        let doc = ScheduleDocument::from_manager(&mgr);

        let rebuilt = doc.into_manager();
        assert_eq!(rebuilt.active_id(), mgr.active_id());
        assert_eq!(rebuilt.templates(), mgr.templates());
        assert_eq!(rebuilt.working(), mgr.working());
    }

    #[test]
    fn document_round_trips_through_json() {
        let doc = ScheduleDocument::from_manager(&populated_manager());
        let json = serde_json::to_string(&doc).unwrap();
        let back: ScheduleDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc, back);
    }

    #[test]
    fn dangling_active_id_clears_selection() {
        let mut doc = ScheduleDocument::from_manager(&populated_manager());
        doc.active_template_id = Some(9999);

        let rebuilt = doc.into_manager();
        assert_eq!(rebuilt.active_id(), None);
    }

    #[test]
    fn empty_document_yields_unconfigured_manager() {
        let mgr = ScheduleDocument::default().into_manager();
        assert_eq!(mgr.active_id(), None);
        assert!(mgr.templates().is_empty());
        assert_eq!(mgr.working(), &WorkingWeek::default());
    }

    #[test]
    fn document_uses_wire_field_names() {
        let doc = ScheduleDocument::from_manager(&populated_manager());
        let value = serde_json::to_value(&doc).unwrap();
        assert!(value.get("budgetHours").is_some());
        assert!(value.get("activeTemplateId").is_some());
        assert!(value.get("weekDates").is_some());
        assert!(value["templates"][0].get("startDate").is_some());
    }
}
