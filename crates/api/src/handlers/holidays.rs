//! Handlers for holidays: per-day under `/schedule/days/{day}/holiday`,
//! plus the week-wide `/schedule/holidays` bulk clear.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use rota_core::aggregate::WeekSummary;

use crate::error::AppResult;
use crate::handlers::{parse_day, session_for};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /schedule/days/{day}/holiday`.
#[derive(Debug, Deserialize)]
pub struct HolidayRequest {
    pub label: String,
    #[serde(default)]
    pub description: String,
}

/// PUT /api/v1/schedule/days/{day}/holiday
///
/// Marking a holiday clears every shift entry on that day immediately.
pub async fn set_holiday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(day): Path<String>,
    Json(input): Json<HolidayRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let day = parse_day(&day)?;

    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager
            .working_mut()
            .set_holiday(day, &input.label, &input.description)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/schedule/holidays
///
/// Clears every holiday in the week at once. Like the per-day clear, it is
/// idempotent and does not restore previously removed entries.
pub async fn clear_all_holidays(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().clear_all_holidays();
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/schedule/days/{day}/holiday
///
/// Idempotent; entries cleared when the holiday was set are not restored.
pub async fn clear_holiday(
    State(state): State<AppState>,
    user: AuthUser,
    Path(day): Path<String>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let day = parse_day(&day)?;

    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().clear_holiday(day);
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}
