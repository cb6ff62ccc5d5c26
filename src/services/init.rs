//! Initialization helpers for the application:
//! - database connection + migrations
//! - optional push service (FCM)
//!
//! This module centralizes bits that would otherwise live in `main.rs`.

use std::{path::Path, sync::Arc};

use anyhow::Result;
use tokio::sync::RwLock;

use crate::config::{Config, FcmConfig};
use crate::services::fcm::FcmService;
use crate::services::google_auth::ServiceAccountKey;

/// Redact potentially sensitive information from a database URL before logging.
///
/// Attempts to parse the URL and remove userinfo (username:password) components.
/// Falls back to removing everything before '@' or returning "(redacted)".
pub fn redact_db_url(db_url: &str) -> String {
    if let Ok(url) = url::Url::parse(db_url) {
        let scheme = url.scheme();
        let host = url.host_str().unwrap_or("");
        let port_part = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
        let path = url.path();
        format!("{}://{}{}{}", scheme, host, port_part, path)
    } else {
        if let Some(at_pos) = db_url.find('@') {
            let without_creds = &db_url[at_pos + 1..];
            return format!("(redacted){}", without_creds);
        }
        "(redacted)".to_string()
    }
}

/// Initialize SQLite database connection and run migrations.
///
/// Creates the parent directory for the database file (if applicable),
/// opens a connection pool using `create_if_missing(true)` and runs migrations.
pub async fn init_db(config: &Config) -> Result<sqlx::SqlitePool> {
    let db_url = &config.database.url;
    tracing::info!("Connecting to profile store: {}", redact_db_url(db_url));

    let db_path = db_url.strip_prefix("sqlite://").unwrap_or(db_url);
    let db_file_path = Path::new(db_path);

    if let Some(parent) = db_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }

    let existed = db_file_path.exists();

    let connect_options = sqlx::sqlite::SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true);

    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;

    if existed {
        tracing::info!("Opened database file: {}", db_file_path.display());
    } else {
        tracing::info!("Database file created: {}", db_file_path.display());
    }

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Build the FCM client from the configured service-account key.
pub fn build_push_service(config: &FcmConfig) -> crate::error::AppResult<Option<FcmService>> {
    let Some(ref path) = config.credentials_path else {
        return Ok(None);
    };
    let key = ServiceAccountKey::from_file(path)?;
    FcmService::new(config, key).map(Some)
}

/// Initialize the optional push service and store it into the shared slot.
///
/// Failures are logged; without a push service the application still starts
/// and every send is reported as failed.
pub async fn initialize_push_service(
    config: &FcmConfig,
    slot: &Arc<RwLock<Option<FcmService>>>,
) {
    if !config.is_configured() {
        tracing::warn!(
            "GOOGLE_APPLICATION_CREDENTIALS not set; push notifications will not be delivered"
        );
        return;
    }

    tracing::info!("Initializing FCM push service");
    match build_push_service(config) {
        Ok(Some(fcm)) => {
            tracing::info!(
                "FCM push service initialized for project {}",
                fcm.project_id()
            );
            *slot.write().await = Some(fcm);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::warn!("Failed to initialize FCM push service: {}", e);
        }
    }
}
