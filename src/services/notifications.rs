use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::services::composer;
use crate::services::eligibility;
use crate::services::events::{DebtEvent, FriendRequestEvent};
use crate::services::fcm::FcmService;
use crate::services::profiles::{ProfileResolver, ProfileStore};

/// Categories of push notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationCategory {
    FriendRequest,
    NewDebt,
    GroupDebt,
    DebtPaid,
}

impl NotificationCategory {
    /// Machine-readable tag sent as `data.type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::FriendRequest => "friendRequest",
            NotificationCategory::NewDebt => "newDebt",
            NotificationCategory::GroupDebt => "groupDebt",
            NotificationCategory::DebtPaid => "debtPaid",
        }
    }
}

/// Unified notification content (borrows the event data)
#[derive(Debug, Clone, Copy)]
pub enum NotificationContent<'a> {
    FriendRequest { sender_name: Option<&'a str> },
    Debt(&'a DebtEvent),
}

impl NotificationContent<'_> {
    /// `None` for debt records of an unknown sub-type.
    pub fn category(&self) -> Option<NotificationCategory> {
        match self {
            NotificationContent::FriendRequest { .. } => Some(NotificationCategory::FriendRequest),
            NotificationContent::Debt(event) => event.kind.category(),
        }
    }

    fn label(&self) -> String {
        match self.category() {
            Some(category) => category.as_str().to_string(),
            None => match self {
                NotificationContent::Debt(event) => format!("debt {}", event.kind),
                NotificationContent::FriendRequest { .. } => "friendRequest".to_string(),
            },
        }
    }
}

/// A composed push message addressed to one device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundNotification {
    pub title: String,
    pub body: String,
    pub category: NotificationCategory,
    pub device_token: String,
}

/// Why an event did not lead to a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    NoToken,
    NotificationsDisabled,
    CategoryDisabled,
    UnknownCategory,
    MalformedEvent,
    ProfileUnavailable,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NoToken => "no-token",
            SkipReason::NotificationsDisabled => "notifications-disabled",
            SkipReason::CategoryDisabled => "category-disabled",
            SkipReason::UnknownCategory => "unknown-category",
            SkipReason::MalformedEvent => "malformed-event",
            SkipReason::ProfileUnavailable => "profile-unavailable",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of handling one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DispatchOutcome {
    Sent { message_id: String },
    Skipped { reason: SkipReason },
    SendFailed { error: String },
}

impl DispatchOutcome {
    pub fn skipped(reason: SkipReason) -> Self {
        DispatchOutcome::Skipped { reason }
    }
}

/// Single-attempt delivery of one push message. Returns the transport's
/// message id.
#[async_trait]
pub trait PushSender: Send + Sync + 'static {
    async fn send(&self, notification: &OutboundNotification) -> AppResult<String>;
}

/// Sender backed by the push service slot in `AppState`. The slot stays
/// empty when no credentials are configured and every send then fails.
pub struct PushGateway {
    fcm: Arc<RwLock<Option<FcmService>>>,
}

impl PushGateway {
    pub fn new(fcm: Arc<RwLock<Option<FcmService>>>) -> Self {
        Self { fcm }
    }
}

#[async_trait]
impl PushSender for PushGateway {
    async fn send(&self, notification: &OutboundNotification) -> AppResult<String> {
        // Clone the Option<FcmService> out of the RwLock guard so we can own it
        let fcm_opt = self.fcm.read().await.clone();
        match fcm_opt {
            Some(fcm) => fcm.send_message(notification).await,
            None => Err(AppError::Push("Push service not initialized".to_string())),
        }
    }
}

/// Decides and delivers push notifications for created documents.
///
/// Every method returns a `DispatchOutcome` and never an error: failures are
/// logged here and absorbed so the trigger source never redelivers an event
/// because of them. Holds no per-event state and is shared across concurrent
/// invocations.
pub struct NotificationDispatcher {
    profiles: ProfileResolver,
    sender: Arc<dyn PushSender>,
}

impl NotificationDispatcher {
    pub fn new(store: Arc<dyn ProfileStore>, sender: Arc<dyn PushSender>) -> Self {
        Self {
            profiles: ProfileResolver::new(store),
            sender,
        }
    }

    /// Entry point for a created friend-request document.
    pub async fn handle_friend_request_document(&self, doc: &Value) -> DispatchOutcome {
        match FriendRequestEvent::from_document(doc) {
            Ok(event) => self.on_friend_request_created(&event).await,
            Err(e) => {
                tracing::info!("Skipping friend request document: {}", e);
                DispatchOutcome::skipped(SkipReason::MalformedEvent)
            }
        }
    }

    /// Entry point for a created debt notification document.
    pub async fn handle_debt_record_document(&self, doc: &Value) -> DispatchOutcome {
        match DebtEvent::from_document(doc) {
            Ok(event) => self.on_debt_record_created(&event).await,
            Err(e) => {
                tracing::info!("Skipping debt record document: {}", e);
                DispatchOutcome::skipped(SkipReason::MalformedEvent)
            }
        }
    }

    pub async fn on_friend_request_created(&self, event: &FriendRequestEvent) -> DispatchOutcome {
        // The sender only contributes a display name; failing to read it is not fatal.
        let sender_name = match event.sender_id.as_deref() {
            Some(sender_id) => match self.profiles.resolve(sender_id).await {
                Ok(profile) => profile.display_name().map(str::to_string),
                Err(e) => {
                    tracing::warn!(
                        "Failed to load sender profile {}; using placeholder name: {}",
                        sender_id,
                        e
                    );
                    None
                }
            },
            None => None,
        };

        let content = NotificationContent::FriendRequest {
            sender_name: sender_name.as_deref(),
        };
        self.deliver(&event.receiver_id, content).await
    }

    pub async fn on_debt_record_created(&self, event: &DebtEvent) -> DispatchOutcome {
        self.deliver(&event.to_user, NotificationContent::Debt(event))
            .await
    }

    /// resolve -> gate -> compose -> send, for one recipient.
    async fn deliver(
        &self,
        recipient_id: &str,
        content: NotificationContent<'_>,
    ) -> DispatchOutcome {
        let label = content.label();

        let profile = match self.profiles.resolve(recipient_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::error!(
                    "Failed to load profile for user {} ({} notification): {}",
                    recipient_id,
                    label,
                    e
                );
                return DispatchOutcome::skipped(SkipReason::ProfileUnavailable);
            }
        };

        let recipient = match eligibility::check(&profile, content.category()) {
            Ok(recipient) => recipient,
            Err(reason) => {
                tracing::info!(
                    "Skipping {} notification for user {}: {}",
                    label,
                    recipient_id,
                    reason
                );
                return DispatchOutcome::skipped(reason);
            }
        };

        let notification = composer::compose(content, recipient, profile.lang.as_deref());

        match self.sender.send(&notification).await {
            Ok(message_id) => {
                tracing::info!(
                    "Sent {} notification to user {}: message_id={}",
                    label,
                    recipient_id,
                    message_id
                );
                DispatchOutcome::Sent { message_id }
            }
            Err(e) => {
                tracing::error!(
                    "Failed to send {} notification to user {}: {}",
                    label,
                    recipient_id,
                    e
                );
                DispatchOutcome::SendFailed {
                    error: e.to_string(),
                }
            }
        }
    }
}
