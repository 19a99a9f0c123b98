//! In-app intern notification model.

use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `intern_notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InternNotification {
    pub id: DbId,
    pub intern_id: DbId,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}
