//! Repository for the `schedule_documents` table.
//!
//! Each user owns at most one document row. Saves replace the whole
//! JSONB payload, mirroring the replace-on-save persistence model.

use sqlx::PgPool;

use rota_core::types::DbId;

/// Load/replace operations for per-user schedule documents.
pub struct ScheduleDocumentRepo;

impl ScheduleDocumentRepo {
    /// Load the stored document for a user, if any.
    pub async fn load(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<serde_json::Value>, sqlx::Error> {
        let row: Option<(serde_json::Value,)> =
            sqlx::query_as("SELECT document FROM schedule_documents WHERE user_id = $1")
                .bind(user_id)
                .fetch_optional(pool)
                .await?;
        Ok(row.map(|(document,)| document))
    }

    /// Insert or replace the document for a user.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        document: &serde_json::Value,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO schedule_documents (user_id, document) \
             VALUES ($1, $2) \
             ON CONFLICT (user_id) \
             DO UPDATE SET document = EXCLUDED.document, updated_at = now()",
        )
        .bind(user_id)
        .bind(document)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Delete the document for a user. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM schedule_documents WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
