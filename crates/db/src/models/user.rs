use serde::Serialize;
use sqlx::FromRow;

use rota_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// `password_hash` is skipped on serialization so the row can be embedded
/// in API responses directly.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
