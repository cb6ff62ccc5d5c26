use std::time::Duration as StdDuration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::FcmConfig;
use crate::error::{AppError, AppResult};
use crate::services::google_auth::{GoogleTokenProvider, ServiceAccountKey};
use crate::services::notifications::{OutboundNotification, PushSender};

const FCM_API_URL: &str = "https://fcm.googleapis.com/v1";

#[derive(Debug, Deserialize)]
struct SendResponse {
    /// `projects/{project}/messages/{id}`
    name: String,
}

/// Firebase Cloud Messaging HTTP v1 client.
#[derive(Clone)]
pub struct FcmService {
    client: Client,
    project_id: String,
    api_base: String,
    auth: GoogleTokenProvider,
}

impl FcmService {
    pub fn new(config: &FcmConfig, key: ServiceAccountKey) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(e.into()))?;

        let project_id = config
            .project_id
            .clone()
            .or_else(|| key.project_id.clone())
            .ok_or_else(|| {
                AppError::Config(
                    "FCM project id is neither configured nor present in the service account key"
                        .to_string(),
                )
            })?;

        let auth = GoogleTokenProvider::new(client.clone(), key)?;

        Ok(Self {
            client,
            project_id,
            api_base: FCM_API_URL.to_string(),
            auth,
        })
    }

    #[cfg(test)]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Request body for `messages:send`.
    pub fn message_body(notification: &OutboundNotification) -> Value {
        json!({
            "message": {
                "token": notification.device_token,
                "notification": {
                    "title": notification.title,
                    "body": notification.body
                },
                "data": {
                    "type": notification.category.as_str()
                }
            }
        })
    }

    /// Send one message. Returns the message id assigned by FCM.
    pub async fn send_message(&self, notification: &OutboundNotification) -> AppResult<String> {
        let access_token = self.auth.access_token().await?;
        let url = format!(
            "{}/projects/{}/messages:send",
            self.api_base, self.project_id
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(access_token)
            .json(&Self::message_body(notification))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Push(format!(
                "FCM API error ({}): {}",
                status, error_text
            )));
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| AppError::Push(format!("Failed to parse FCM response: {}", e)))?;

        Ok(sent.name)
    }
}

#[async_trait]
impl PushSender for FcmService {
    async fn send(&self, notification: &OutboundNotification) -> AppResult<String> {
        self.send_message(notification).await
    }
}
