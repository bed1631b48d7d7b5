use std::sync::Arc;

use crate::config::ServerConfig;
use crate::session::SessionManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: rota_db::DbPool,
    /// Server configuration (JWT settings, CORS, timeouts, debounce).
    pub config: Arc<ServerConfig>,
    /// Live per-user schedule sessions.
    pub sessions: Arc<SessionManager>,
}
