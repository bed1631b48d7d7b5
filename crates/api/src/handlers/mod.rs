pub mod auth;
pub mod holidays;
pub mod schedule;
pub mod shifts;
pub mod staff;
pub mod templates;

use std::sync::Arc;

use rota_core::schedule::{ShiftKind, Weekday};
use rota_db::gateway::PgGateway;

use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::session::Session;
use crate::state::AppState;

/// Fetch (or lazily load) the authenticated user's schedule session.
pub(crate) async fn session_for(
    state: &AppState,
    user: &AuthUser,
) -> Result<Arc<Session>, AppError> {
    let gateway = Arc::new(PgGateway::new(state.pool.clone(), user.user_id));
    let session = state.sessions.get_or_load(user.user_id, gateway).await?;
    Ok(session)
}

/// Parse a weekday path segment, case-insensitively (`monday`..`friday`).
pub(crate) fn parse_day(raw: &str) -> Result<Weekday, AppError> {
    Weekday::ALL
        .into_iter()
        .find(|d| d.name().eq_ignore_ascii_case(raw))
        .ok_or_else(|| AppError::BadRequest(format!("Unknown weekday '{raw}'")))
}

/// Parse a shift-kind path segment. Accepts `morning`, `afternoon`, and
/// any spelling of the meeting slot (`pm-meeting`, `pm_meeting`, `PM Meeting`).
pub(crate) fn parse_kind(raw: &str) -> Result<ShiftKind, AppError> {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match normalized.as_str() {
        "morning" => Ok(ShiftKind::Morning),
        "afternoon" => Ok(ShiftKind::Afternoon),
        "pmmeeting" => Ok(ShiftKind::PmMeeting),
        _ => Err(AppError::BadRequest(format!("Unknown shift '{raw}'"))),
    }
}
