use std::env;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub trigger: TriggerConfig,
    pub fcm: FcmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Emit JSON log lines instead of the human-readable format.
    /// Read from env var `LOG_FORMAT` (`json` or `text`).
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TriggerConfig {
    /// Shared secret used to sign document-creation webhooks.
    pub secret: String,
    /// Maximum accepted age (seconds) of a trigger timestamp.
    pub max_age_seconds: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FcmConfig {
    /// Overrides the `project_id` of the service-account key.
    pub project_id: Option<String>,
    /// Path to the Google service-account JSON key.
    pub credentials_path: Option<String>,
    pub request_timeout_seconds: u64,
}

impl FcmConfig {
    /// The service-account key is required; the project id can come from it.
    pub fn is_configured(&self) -> bool {
        self.credentials_path.is_some()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server: ServerConfig {
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("PORT".to_string()))?,
            },
            logging: LoggingConfig {
                json: match env::var("LOG_FORMAT") {
                    Ok(v) => v.eq_ignore_ascii_case("json"),
                    Err(_) => false,
                },
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "sqlite://data/profiles.db".to_string()),
                max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or_else(|_| "5".to_string())
                    .parse()
                    .unwrap_or(5),
            },
            trigger: TriggerConfig {
                secret: required_env("TRIGGER_SECRET")?,
                max_age_seconds: env::var("TRIGGER_MAX_AGE_SECONDS")
                    .unwrap_or_else(|_| "600".to_string())
                    .parse()
                    .unwrap_or(600),
            },
            fcm: FcmConfig {
                project_id: non_empty_env("FCM_PROJECT_ID"),
                credentials_path: non_empty_env("GOOGLE_APPLICATION_CREDENTIALS"),
                request_timeout_seconds: env::var("FCM_REQUEST_TIMEOUT_SECONDS")
                    .unwrap_or_else(|_| "30".to_string())
                    .parse()
                    .unwrap_or(30u64),
            },
        })
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Blank values count as missing.
fn required_env(key: &str) -> Result<String, ConfigError> {
    non_empty_env(key).ok_or_else(|| ConfigError::MissingEnv(key.to_string()))
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            logging: LoggingConfig { json: false },
            database: DatabaseConfig {
                url: "sqlite://data/profiles.db".to_string(),
                max_connections: 5,
            },
            trigger: TriggerConfig {
                secret: String::new(),
                max_age_seconds: 600,
            },
            fcm: FcmConfig {
                project_id: None,
                credentials_path: None,
                request_timeout_seconds: 30,
            },
        }
    }
}
