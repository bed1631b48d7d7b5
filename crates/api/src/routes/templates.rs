//! Route definitions for the `/templates` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::templates;
use crate::state::AppState;

/// Routes mounted at `/templates`. All require a Bearer token.
///
/// ```text
/// GET    /             -> list templates + active id
/// POST   /             -> create (and activate) a template
/// POST   /{id}/load    -> make a template active
/// POST   /{id}/save    -> save the working copy into a template
/// PUT    /{id}/budget  -> edit a stored template's budget in place
/// DELETE /{id}         -> delete a template
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(templates::list_templates).post(templates::create_template),
        )
        .route("/{id}/load", post(templates::load_template))
        .route("/{id}/save", post(templates::save_template))
        .route("/{id}/budget", put(templates::update_template_budget))
        .route("/{id}", axum::routing::delete(templates::delete_template))
}
