use sqlx::SqlitePool;

use crate::db::models::*;
use crate::error::{AppError, AppResult};

// ============================================================================
// User Document Repository
// ============================================================================

pub struct UserDocumentRepository;

impl UserDocumentRepository {
    /// Point read of a single profile document. Read-only: profile documents
    /// are owned by the mobile backend.
    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> AppResult<Option<UserDocument>> {
        sqlx::query_as::<_, UserDocument>(
            r#"
            SELECT id, data, updated_at
            FROM user_documents
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Database)
    }
}
