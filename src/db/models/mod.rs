//! Database models split into separate files.

pub mod user_document;
pub mod user_profile;

pub use self::user_document::*;
pub use self::user_profile::*;
