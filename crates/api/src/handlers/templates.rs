//! Handlers for the `/templates` resource.

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use rota_core::template::{NewTemplate, WeekTemplate};
use rota_core::types::TemplateId;

use crate::error::AppResult;
use crate::handlers::session_for;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// The template collection plus the active pointer.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateList {
    pub templates: Vec<WeekTemplate>,
    pub active_id: Option<TemplateId>,
}

/// Response for `POST /templates`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTemplate {
    pub id: TemplateId,
    pub templates: Vec<WeekTemplate>,
    pub active_id: Option<TemplateId>,
}

/// GET /api/v1/templates
pub async fn list_templates(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<TemplateList>>> {
    let session = session_for(&state, &user).await?;
    let manager = session.manager().await;

    let list = TemplateList {
        templates: manager.templates().to_vec(),
        active_id: manager.active_id(),
    };
    Ok(Json(DataResponse { data: list }))
}

/// POST /api/v1/templates
///
/// Creates a template from a date range, makes it active, and resets the
/// working copy to it.
pub async fn create_template(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<NewTemplate>,
) -> AppResult<Json<DataResponse<CreatedTemplate>>> {
    let session = session_for(&state, &user).await?;
    let created = {
        let mut manager = session.manager().await;
        let id = manager.create(input)?;
        CreatedTemplate {
            id,
            templates: manager.templates().to_vec(),
            active_id: manager.active_id(),
        }
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: created }))
}

/// POST /api/v1/templates/{id}/load
///
/// Saves the outgoing working copy into its template, then deep-copies the
/// target template into the working copy.
pub async fn load_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<TemplateId>,
) -> AppResult<Json<DataResponse<TemplateList>>> {
    let session = session_for(&state, &user).await?;
    let list = {
        let mut manager = session.manager().await;
        manager.load(id)?;
        TemplateList {
            templates: manager.templates().to_vec(),
            active_id: manager.active_id(),
        }
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: list }))
}

/// POST /api/v1/templates/{id}/save
pub async fn save_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<TemplateId>,
) -> AppResult<Json<DataResponse<TemplateList>>> {
    let session = session_for(&state, &user).await?;
    let list = {
        let mut manager = session.manager().await;
        manager.save(Some(id))?;
        TemplateList {
            templates: manager.templates().to_vec(),
            active_id: manager.active_id(),
        }
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: list }))
}

/// Request body for `PUT /templates/{id}/budget`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateBudgetRequest {
    pub budget_hours: f64,
}

/// PUT /api/v1/templates/{id}/budget
///
/// Edits a stored template's budget in place, without loading it. When the
/// target is the active template the working copy's budget follows.
pub async fn update_template_budget(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<TemplateId>,
    Json(input): Json<TemplateBudgetRequest>,
) -> AppResult<Json<DataResponse<TemplateList>>> {
    let session = session_for(&state, &user).await?;
    let list = {
        let mut manager = session.manager().await;
        manager.set_template_budget(id, input.budget_hours)?;
        TemplateList {
            templates: manager.templates().to_vec(),
            active_id: manager.active_id(),
        }
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: list }))
}

/// DELETE /api/v1/templates/{id}
///
/// Deleting the active template leaves the manager unconfigured; no other
/// template is auto-loaded.
pub async fn delete_template(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<TemplateId>,
) -> AppResult<Json<DataResponse<TemplateList>>> {
    let session = session_for(&state, &user).await?;
    let list = {
        let mut manager = session.manager().await;
        manager.delete(id)?;
        TemplateList {
            templates: manager.templates().to_vec(),
            active_id: manager.active_id(),
        }
    };
    state.sessions.schedule_save(&session);
    Ok(Json(DataResponse { data: list }))
}
