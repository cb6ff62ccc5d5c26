use serde_json::{Map, Value};

/// A stored preference read as three values. Only an explicit `false`
/// disables; an absent, `null`, or wrongly-typed field is `Unset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreferenceFlag {
    Enabled,
    Disabled,
    #[default]
    Unset,
}

impl PreferenceFlag {
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            Some(Value::Bool(true)) => PreferenceFlag::Enabled,
            Some(Value::Bool(false)) => PreferenceFlag::Disabled,
            _ => PreferenceFlag::Unset,
        }
    }

    pub fn is_enabled(self) -> bool {
        !matches!(self, PreferenceFlag::Disabled)
    }
}

/// Notification-relevant view of a user document. A user without a document
/// is `UserProfile::default()`: no name, no token, every flag unset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserProfile {
    pub name: Option<String>,
    pub device_token: Option<String>,
    pub lang: Option<String>,
    pub notifications_enabled: PreferenceFlag,
    pub friend_request_enabled: PreferenceFlag,
    pub individual_debt_enabled: PreferenceFlag,
    pub group_debt_enabled: PreferenceFlag,
    pub debt_paid_enabled: PreferenceFlag,
}

const PREFERENCE_FIELDS: [&str; 5] = [
    "notificationsEnabled",
    "friendRequestEnabled",
    "individualDebtEnabled",
    "groupDebtEnabled",
    "debtPaidEnabled",
];

impl UserProfile {
    pub fn from_document(user_id: &str, doc: &Map<String, Value>) -> Self {
        for field in PREFERENCE_FIELDS {
            if let Some(value) = doc.get(field) {
                if !value.is_boolean() && !value.is_null() {
                    tracing::debug!(
                        "User {} has non-boolean {}={}; treating it as unset",
                        user_id,
                        field,
                        value
                    );
                }
            }
        }

        let string_field = |key: &str| doc.get(key).and_then(Value::as_str).map(str::to_string);

        Self {
            name: string_field("name"),
            device_token: string_field("deviceToken").or_else(|| string_field("fcmToken")),
            lang: string_field("lang"),
            notifications_enabled: PreferenceFlag::from_value(doc.get("notificationsEnabled")),
            friend_request_enabled: PreferenceFlag::from_value(doc.get("friendRequestEnabled")),
            individual_debt_enabled: PreferenceFlag::from_value(doc.get("individualDebtEnabled")),
            group_debt_enabled: PreferenceFlag::from_value(doc.get("groupDebtEnabled")),
            debt_paid_enabled: PreferenceFlag::from_value(doc.get("debtPaidEnabled")),
        }
    }

    /// Display name, if the document has a non-empty one.
    pub fn display_name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }

    /// Device token, if the document has a non-empty one.
    pub fn token(&self) -> Option<&str> {
        self.device_token.as_deref().filter(|t| !t.is_empty())
    }
}
