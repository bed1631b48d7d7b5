//! Handlers for the staff roster under `/schedule/staff`.

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use rota_core::aggregate::{StaffWeekSummary, WeekSummary};
use rota_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::handlers::session_for;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /schedule/staff`.
#[derive(Debug, Deserialize)]
pub struct AddStaffRequest {
    pub name: String,
    pub role: String,
    #[serde(default)]
    pub notes: String,
}

/// Request body for `PUT /schedule/staff/{name}`.
#[derive(Debug, Deserialize)]
pub struct UpdateStaffRequest {
    pub role: String,
    #[serde(default)]
    pub notes: String,
}

/// Request body for `POST /schedule/staff/{name}/rename`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameStaffRequest {
    pub new_name: String,
}

/// POST /api/v1/schedule/staff
pub async fn add_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<AddStaffRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager
            .working_mut()
            .add_staff_member(&input.name, &input.role, &input.notes)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// PUT /api/v1/schedule/staff/{name}
pub async fn update_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
    Json(input): Json<UpdateStaffRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager
            .working_mut()
            .update_staff_member(&name, &input.role, &input.notes)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// POST /api/v1/schedule/staff/{name}/rename
pub async fn rename_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
    Json(input): Json<RenameStaffRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager
            .working_mut()
            .rename_staff_member(&name, &input.new_name)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/schedule/staff/{name}
pub async fn remove_staff(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().remove_staff_member(&name)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/schedule/staff/{name}/hours
pub async fn staff_hours(
    State(state): State<AppState>,
    user: AuthUser,
    Path(name): Path<String>,
) -> AppResult<Json<DataResponse<StaffWeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let manager = session.manager().await;

    if manager.working().find_staff(&name).is_none() {
        return Err(AppError::Core(CoreError::not_found("Staff member", &name)));
    }
    let breakdown = manager.working().staff_weekly_hours(&name);
    Ok(Json(DataResponse { data: breakdown }))
}
