//! Handlers for shift entries under `/schedule/days/{day}/shifts/{kind}`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use rota_core::aggregate::WeekSummary;

use crate::error::AppResult;
use crate::handlers::{parse_day, parse_kind, session_for};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST .../entries`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddEntryRequest {
    pub start_time: String,
    pub end_time: String,
    pub staff: Vec<String>,
}

/// Request body for `PUT .../entries/{index}/staff/{name}/time`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTimeRequest {
    pub start_time: String,
    pub end_time: String,
}

/// POST /api/v1/schedule/days/{day}/shifts/{kind}/entries
pub async fn add_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path((day, kind)): Path<(String, String)>,
    Json(input): Json<AddEntryRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let day = parse_day(&day)?;
    let kind = parse_kind(&kind)?;

    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().add_shift_entry(
            day,
            kind,
            &input.start_time,
            &input.end_time,
            &input.staff,
        )?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/schedule/days/{day}/shifts/{kind}/entries/{index}/staff/{name}
pub async fn remove_staff_from_entry(
    State(state): State<AppState>,
    user: AuthUser,
    Path((day, kind, index, name)): Path<(String, String, usize, String)>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let day = parse_day(&day)?;
    let kind = parse_kind(&kind)?;

    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager
            .working_mut()
            .remove_staff_from_entry(day, kind, index, &name)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// PUT /api/v1/schedule/days/{day}/shifts/{kind}/entries/{index}/staff/{name}/time
pub async fn edit_staff_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path((day, kind, index, name)): Path<(String, String, usize, String)>,
    Json(input): Json<EditTimeRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let day = parse_day(&day)?;
    let kind = parse_kind(&kind)?;

    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().edit_staff_time(
            day,
            kind,
            index,
            &name,
            &input.start_time,
            &input.end_time,
        )?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}
