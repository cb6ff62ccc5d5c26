use std::fmt;

use serde_json::Value;

use crate::services::notifications::NotificationCategory;

/// Why a created document could not be turned into an event.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedEvent {
    #[error("document is not a JSON object")]
    NotAnObject,

    #[error("missing or empty field `{0}`")]
    MissingField(&'static str),
}

/// Created `friendRequests/{id}` document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FriendRequestEvent {
    /// Absent sender ids fall back to the placeholder name.
    pub sender_id: Option<String>,
    pub receiver_id: String,
}

impl FriendRequestEvent {
    pub fn from_document(doc: &Value) -> Result<Self, MalformedEvent> {
        let doc = doc.as_object().ok_or(MalformedEvent::NotAnObject)?;

        Ok(Self {
            sender_id: non_empty_str(doc.get("senderId")).map(str::to_string),
            receiver_id: non_empty_str(doc.get("receiverId"))
                .ok_or(MalformedEvent::MissingField("receiverId"))?
                .to_string(),
        })
    }
}

/// Sub-type of a debt notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DebtKind {
    NewDebt,
    GroupDebt,
    DebtPaid,
    /// Any other (or missing) `type`; never notified.
    Other(String),
}

impl DebtKind {
    pub fn parse(value: Option<&Value>) -> Self {
        match value.and_then(Value::as_str) {
            Some("newDebt") => DebtKind::NewDebt,
            Some("groupDebt") => DebtKind::GroupDebt,
            Some("debtPaid") => DebtKind::DebtPaid,
            Some(other) => DebtKind::Other(other.to_string()),
            None => DebtKind::Other(String::new()),
        }
    }

    pub fn category(&self) -> Option<NotificationCategory> {
        match self {
            DebtKind::NewDebt => Some(NotificationCategory::NewDebt),
            DebtKind::GroupDebt => Some(NotificationCategory::GroupDebt),
            DebtKind::DebtPaid => Some(NotificationCategory::DebtPaid),
            DebtKind::Other(_) => None,
        }
    }
}

impl fmt::Display for DebtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebtKind::NewDebt => f.write_str("newDebt"),
            DebtKind::GroupDebt => f.write_str("groupDebt"),
            DebtKind::DebtPaid => f.write_str("debtPaid"),
            DebtKind::Other(raw) => write!(f, "{:?}", raw),
        }
    }
}

/// Debt amount exactly as it appeared in the document. No currency
/// formatting or validation is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount(String);

impl Amount {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Number(n)) => Amount(n.to_string()),
            Some(Value::String(s)) => Amount(s.clone()),
            _ => Amount("0".to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount("0".to_string())
    }
}

/// Created debt notification record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebtEvent {
    pub to_user: String,
    pub kind: DebtKind,
    pub amount: Amount,
    pub from_user_label: Option<String>,
}

impl DebtEvent {
    pub fn from_document(doc: &Value) -> Result<Self, MalformedEvent> {
        let doc = doc.as_object().ok_or(MalformedEvent::NotAnObject)?;

        Ok(Self {
            to_user: non_empty_str(doc.get("toUser"))
                .ok_or(MalformedEvent::MissingField("toUser"))?
                .to_string(),
            kind: DebtKind::parse(doc.get("type")),
            amount: Amount::from_value(doc.get("amount")),
            from_user_label: non_empty_str(doc.get("fromUserLabel")).map(str::to_string),
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}
