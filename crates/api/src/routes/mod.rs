pub mod auth;
pub mod health;
pub mod schedule;
pub mod templates;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/logout                                     logout (requires auth)
///
/// /schedule                                        working state + summary (GET)
/// /schedule/summary                                weekly roll-up (GET)
/// /schedule/export                                 printable export model (GET)
/// /schedule/budget                                 set budget (PUT)
/// /schedule/staff                                  add member (POST)
/// /schedule/staff/{name}                           update, remove member
/// /schedule/staff/{name}/rename                    rename member (POST)
/// /schedule/staff/{name}/hours                     weekly breakdown (GET)
/// /schedule/days/{day}/shifts/{kind}/entries       add entry (POST)
/// /schedule/days/{day}/shifts/{kind}/entries/{index}/staff/{name}       remove from entry (DELETE)
/// /schedule/days/{day}/shifts/{kind}/entries/{index}/staff/{name}/time  retime (PUT)
/// /schedule/days/{day}/holiday                     set, clear holiday (PUT, DELETE)
/// /schedule/holidays                               clear every holiday (DELETE)
///
/// /templates                                       list, create (GET, POST)
/// /templates/{id}/load                             make active (POST)
/// /templates/{id}/save                             save working copy into it (POST)
/// /templates/{id}/budget                           edit stored budget (PUT)
/// /templates/{id}                                  delete (DELETE)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (login, refresh, logout).
        .nest("/auth", auth::router())
        // The working week and its mutators.
        .nest("/schedule", schedule::router())
        // Week template collection.
        .nest("/templates", templates::router())
}
