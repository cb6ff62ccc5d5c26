use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::SqlitePool;

use crate::db::{UserDocumentRepository, UserProfile};
use crate::error::{AppError, AppResult};

/// Read access to user profile documents.
#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    /// `Ok(None)` when the user has no document.
    async fn get_user_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;
}

/// Profiles stored as JSON documents in the `user_documents` table.
#[derive(Clone)]
pub struct SqliteProfileStore {
    pool: SqlitePool,
}

impl SqliteProfileStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileStore for SqliteProfileStore {
    async fn get_user_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let Some(doc) = UserDocumentRepository::find_by_id(&self.pool, user_id).await? else {
            return Ok(None);
        };

        let data: Value = serde_json::from_str(&doc.data).map_err(|e| {
            AppError::Document(format!("user {} document is not valid JSON: {}", user_id, e))
        })?;
        let fields = data.as_object().ok_or_else(|| {
            AppError::Document(format!("user {} document is not a JSON object", user_id))
        })?;

        Ok(Some(UserProfile::from_document(user_id, fields)))
    }
}

/// Point reads of profiles, with a missing document resolved to an empty
/// profile (no name, no token, every flag unset).
#[derive(Clone)]
pub struct ProfileResolver {
    store: Arc<dyn ProfileStore>,
}

impl ProfileResolver {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    pub async fn resolve(&self, user_id: &str) -> AppResult<UserProfile> {
        let profile = self.store.get_user_profile(user_id).await?;
        if profile.is_none() {
            tracing::debug!("No profile document for user {}", user_id);
        }
        Ok(profile.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{memory_pool, PreferenceFlag};

    async fn store_with(id: &str, data: &str) -> SqliteProfileStore {
        let pool = memory_pool().await;
        sqlx::query("INSERT INTO user_documents (id, data) VALUES (?, ?)")
            .bind(id)
            .bind(data)
            .execute(&pool)
            .await
            .unwrap();
        SqliteProfileStore::new(pool)
    }

    #[tokio::test]
    async fn reads_profile_fields_from_document() {
        let store = store_with(
            "U1",
            r#"{"name":"Alice","fcmToken":"T1","groupDebtEnabled":false}"#,
        )
        .await;

        let profile = store.get_user_profile("U1").await.unwrap().unwrap();
        assert_eq!(profile.display_name(), Some("Alice"));
        assert_eq!(profile.token(), Some("T1"));
        assert_eq!(profile.group_debt_enabled, PreferenceFlag::Disabled);
    }

    #[tokio::test]
    async fn missing_document_resolves_to_empty_profile() {
        let store = store_with("U1", r#"{"name":"Alice"}"#).await;
        assert!(store.get_user_profile("U2").await.unwrap().is_none());

        let resolver = ProfileResolver::new(Arc::new(store));
        assert_eq!(resolver.resolve("U2").await.unwrap(), UserProfile::default());
    }

    #[tokio::test]
    async fn unreadable_documents_are_errors() {
        let store = store_with("U1", "not json").await;
        assert!(matches!(
            store.get_user_profile("U1").await,
            Err(AppError::Document(_))
        ));

        let store = store_with("U2", r#"["a","b"]"#).await;
        assert!(matches!(
            store.get_user_profile("U2").await,
            Err(AppError::Document(_))
        ));
    }
}
