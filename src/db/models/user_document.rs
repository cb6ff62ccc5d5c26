use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Raw profile document as stored by the mobile backend: the user id and the
/// JSON text of the document.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserDocument {
    pub id: String,
    pub data: String,
    pub updated_at: NaiveDateTime,
}
