use crate::i18n;
use crate::services::eligibility::Eligible;
use crate::services::notifications::{
    NotificationCategory, NotificationContent, OutboundNotification,
};

fn message_key(category: NotificationCategory) -> &'static str {
    match category {
        NotificationCategory::FriendRequest => "friend_request",
        NotificationCategory::NewDebt => "new_debt",
        NotificationCategory::GroupDebt => "group_debt",
        NotificationCategory::DebtPaid => "debt_paid",
    }
}

/// Build the title/body pair for `content` in the recipient's language,
/// addressed to a recipient that passed the gate for this content.
pub fn compose(
    content: NotificationContent<'_>,
    recipient: Eligible<'_>,
    lang: Option<&str>,
) -> OutboundNotification {
    debug_assert_eq!(content.category(), Some(recipient.category));
    let category = recipient.category;
    let key = message_key(category);
    let placeholder = i18n::tr(lang, "placeholder.user", None);

    let title = i18n::tr(lang, &format!("push.{}.title", key), None);
    let body_key = format!("push.{}.body", key);
    let body = match content {
        NotificationContent::FriendRequest { sender_name } => {
            let sender = sender_name
                .filter(|n| !n.is_empty())
                .unwrap_or(placeholder.as_str());
            i18n::tr(lang, &body_key, Some(&[("sender", sender)]))
        }
        NotificationContent::Debt(event) => {
            let from = event
                .from_user_label
                .as_deref()
                .unwrap_or(placeholder.as_str());
            i18n::tr(
                lang,
                &body_key,
                Some(&[("from", from), ("amount", event.amount.as_str())]),
            )
        }
    };

    OutboundNotification {
        title,
        body,
        category,
        device_token: recipient.device_token.to_string(),
    }
}
