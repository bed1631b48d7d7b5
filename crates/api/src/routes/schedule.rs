//! Route definitions for the `/schedule` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{holidays, schedule, shifts, staff};
use crate::state::AppState;

/// Routes mounted at `/schedule`. All require a Bearer token.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(schedule::get_schedule))
        .route("/summary", get(schedule::get_summary))
        .route("/export", get(schedule::get_export))
        .route("/budget", put(schedule::set_budget))
        .route("/staff", post(staff::add_staff))
        .route(
            "/staff/{name}",
            put(staff::update_staff).delete(staff::remove_staff),
        )
        .route("/staff/{name}/rename", post(staff::rename_staff))
        .route("/staff/{name}/hours", get(staff::staff_hours))
        .route(
            "/days/{day}/shifts/{kind}/entries",
            post(shifts::add_entry),
        )
        .route(
            "/days/{day}/shifts/{kind}/entries/{index}/staff/{name}",
            delete(shifts::remove_staff_from_entry),
        )
        .route(
            "/days/{day}/shifts/{kind}/entries/{index}/staff/{name}/time",
            put(shifts::edit_staff_time),
        )
        .route(
            "/days/{day}/holiday",
            put(holidays::set_holiday).delete(holidays::clear_holiday),
        )
        .route("/holidays", delete(holidays::clear_all_holidays))
}
