//! User account models.

use serde::Serialize;
use sqlx::FromRow;
use wardrobe_core::types::{DbId, Timestamp};

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub account: String,
    pub nickname: String,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
}
