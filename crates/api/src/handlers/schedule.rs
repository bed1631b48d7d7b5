//! Handlers for the schedule's read views and the budget.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use rota_core::aggregate::WeekSummary;
use rota_core::export::ExportModel;
use rota_core::schedule::WorkingWeek;
use rota_core::types::TemplateId;

use crate::error::AppResult;
use crate::handlers::session_for;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The whole working state plus its roll-up, as returned by `GET /schedule`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleView {
    pub week: WorkingWeek,
    pub active_template_id: Option<TemplateId>,
    pub summary: WeekSummary,
}

/// Request body for `PUT /schedule/budget`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub budget_hours: f64,
}

/// GET /api/v1/schedule
pub async fn get_schedule(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ScheduleView>>> {
    let session = session_for(&state, &user).await?;
    let manager = session.manager().await;

    let view = ScheduleView {
        week: manager.working().clone(),
        active_template_id: manager.active_id(),
        summary: manager.working().week_summary(),
    };
    Ok(Json(DataResponse { data: view }))
}

/// GET /api/v1/schedule/summary
pub async fn get_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = session.manager().await.working().week_summary();
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/schedule/export
pub async fn get_export(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ExportModel>>> {
    let session = session_for(&state, &user).await?;
    let model = session.manager().await.working().build_export_model();
    Ok(Json(DataResponse { data: model }))
}

/// PUT /api/v1/schedule/budget
pub async fn set_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<BudgetRequest>,
) -> AppResult<Json<DataResponse<WeekSummary>>> {
    let session = session_for(&state, &user).await?;
    let summary = {
        let mut manager = session.manager().await;
        manager.working_mut().set_budget_hours(input.budget_hours)?;
        manager.working().week_summary()
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: summary }))
}
