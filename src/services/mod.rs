pub mod composer;
pub mod eligibility;
pub mod events;
pub mod fcm;
pub mod google_auth;
pub mod init;
pub mod notifications;
pub mod profiles;
pub mod triggers;

#[cfg(test)]
pub mod testing;
