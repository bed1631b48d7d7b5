//! Postgres-backed implementation of the core persistence gateway.

use async_trait::async_trait;
use sqlx::PgPool;

use rota_core::document::{GatewayError, PersistenceGateway, ScheduleDocument};
use rota_core::types::DbId;

use crate::repositories::{ScheduleDocumentRepo, UserRepo};

/// Loads and saves one user's schedule document as JSONB.
///
/// Every save re-checks that the owning account still exists and is
/// active, so a deactivated user's session stops persisting instead of
/// silently resurrecting rows.
#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
    user_id: DbId,
}

impl PgGateway {
    pub fn new(pool: PgPool, user_id: DbId) -> Self {
        Self { pool, user_id }
    }
}

#[async_trait]
impl PersistenceGateway for PgGateway {
    async fn load(&self) -> Result<Option<ScheduleDocument>, GatewayError> {
        let value = ScheduleDocumentRepo::load(&self.pool, self.user_id)
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        match value {
            None => Ok(None),
            Some(value) => {
                let document: ScheduleDocument = serde_json::from_value(value)
                    .map_err(|err| GatewayError::Unavailable(format!("corrupt document: {err}")))?;
                Ok(Some(document))
            }
        }
    }

    async fn save(&self, document: &ScheduleDocument) -> Result<(), GatewayError> {
        let user = UserRepo::find_by_id(&self.pool, self.user_id)
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        match user {
            Some(user) if user.is_active => {}
            _ => return Err(GatewayError::Unauthorized),
        }

        let value = serde_json::to_value(document)
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;
        ScheduleDocumentRepo::upsert(&self.pool, self.user_id, &value)
            .await
            .map_err(|err| GatewayError::Unavailable(err.to_string()))?;

        tracing::debug!(user_id = self.user_id, "schedule document saved");
        Ok(())
    }
}
