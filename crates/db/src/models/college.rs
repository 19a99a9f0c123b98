//! College directory entries.

use cohort_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `colleges` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct College {
    pub id: DbId,
    pub name: String,
    pub contact_name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting or replacing a directory entry.
#[derive(Debug, Deserialize)]
pub struct UpsertCollege {
    pub name: String,
    pub contact_name: String,
}
