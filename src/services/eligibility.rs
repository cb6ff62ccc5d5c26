use crate::db::models::{PreferenceFlag, UserProfile};
use crate::services::notifications::{NotificationCategory, SkipReason};

/// A recipient that passed every gate, with the recognized category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Eligible<'a> {
    pub device_token: &'a str,
    pub category: NotificationCategory,
}

/// Per-category preference flag of a profile.
pub fn category_flag(profile: &UserProfile, category: NotificationCategory) -> PreferenceFlag {
    match category {
        NotificationCategory::FriendRequest => profile.friend_request_enabled,
        NotificationCategory::NewDebt => profile.individual_debt_enabled,
        NotificationCategory::GroupDebt => profile.group_debt_enabled,
        NotificationCategory::DebtPaid => profile.debt_paid_enabled,
    }
}

/// Gate a recipient in fixed order: device token, master switch, category
/// switch. Returns the token to deliver to, or the first failing reason.
/// An unrecognized category (`None`) fails at the category step.
pub fn check(
    profile: &UserProfile,
    category: Option<NotificationCategory>,
) -> Result<Eligible<'_>, SkipReason> {
    let device_token = profile.token().ok_or(SkipReason::NoToken)?;

    if !profile.notifications_enabled.is_enabled() {
        return Err(SkipReason::NotificationsDisabled);
    }

    let category = category.ok_or(SkipReason::UnknownCategory)?;
    if !category_flag(profile, category).is_enabled() {
        return Err(SkipReason::CategoryDisabled);
    }

    Ok(Eligible {
        device_token,
        category,
    })
}
