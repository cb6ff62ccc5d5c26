use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use http::HeaderMap;
use sha2::Sha256;

use crate::config::TriggerConfig;
use crate::error::{AppError, AppResult};

type HmacSha256 = Hmac<Sha256>;

pub const TRIGGER_EVENT_ID_HEADER: &str = "x-trigger-event-id";
pub const TRIGGER_TIMESTAMP_HEADER: &str = "x-trigger-timestamp";
pub const TRIGGER_SIGNATURE_HEADER: &str = "x-trigger-signature";

/// Delivery metadata sent with every document-creation trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerHeaders {
    pub event_id: String,
    pub timestamp: String,
    pub signature: String,
}

pub struct TriggerVerifier;

impl TriggerVerifier {
    /// Extract required headers from request
    pub fn extract_headers(headers: &HeaderMap) -> AppResult<TriggerHeaders> {
        Ok(TriggerHeaders {
            event_id: Self::get_header(headers, TRIGGER_EVENT_ID_HEADER)?,
            timestamp: Self::get_header(headers, TRIGGER_TIMESTAMP_HEADER)?,
            signature: Self::get_header(headers, TRIGGER_SIGNATURE_HEADER)?,
        })
    }

    /// `sha256=` + hex HMAC-SHA256 over event id, timestamp and raw body.
    #[cfg(test)]
    pub fn sign(secret: &str, event_id: &str, timestamp: &str, body: &[u8]) -> AppResult<String> {
        let mac = Self::mac(secret, event_id, timestamp, body)?;
        Ok(format!("sha256={}", hex::encode(mac.finalize().into_bytes())))
    }

    /// Verify trigger signature and freshness.
    pub fn verify_signature(
        config: &TriggerConfig,
        trigger: &TriggerHeaders,
        body: &[u8],
        now: DateTime<Utc>,
    ) -> AppResult<()> {
        let expected_sig = match trigger.signature.strip_prefix("sha256=") {
            Some(hex_sig) => hex::decode(hex_sig)
                .map_err(|_| AppError::BadRequest("Invalid signature format".to_string()))?,
            None => return Err(AppError::BadRequest("Invalid signature format".to_string())),
        };

        let mac = Self::mac(&config.secret, &trigger.event_id, &trigger.timestamp, body)?;
        mac.verify_slice(&expected_sig)
            .map_err(|_| AppError::Unauthorized)?;

        let sent_at = DateTime::parse_from_rfc3339(&trigger.timestamp)
            .map_err(|_| AppError::BadRequest("Invalid trigger timestamp".to_string()))?;
        let age = now.signed_duration_since(sent_at);
        if age.num_seconds().abs() > config.max_age_seconds {
            return Err(AppError::BadRequest("Trigger too old".to_string()));
        }

        Ok(())
    }

    fn mac(secret: &str, event_id: &str, timestamp: &str, body: &[u8]) -> AppResult<HmacSha256> {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| AppError::Internal(anyhow::anyhow!("Failed to create HMAC")))?;
        mac.update(event_id.as_bytes());
        mac.update(timestamp.as_bytes());
        mac.update(body);
        Ok(mac)
    }

    fn get_header(headers: &HeaderMap, name: &str) -> AppResult<String> {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .ok_or_else(|| AppError::BadRequest(format!("Missing header: {}", name)))
    }
}
