use sqlx::FromRow;

use rota_core::types::{DbId, Timestamp};

/// A row from the `auth_sessions` table (refresh-token sessions).
#[derive(Debug, Clone, FromRow)]
pub struct AuthSession {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
