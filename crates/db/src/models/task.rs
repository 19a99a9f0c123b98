//! Weekly task model and DTOs.

use cohort_core::error::CoreError;
use cohort_core::task::TaskStatus;
use cohort_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub intern_id: DbId,
    pub week_number: i32,
    pub title: String,
    pub description: String,
    pub deadline: Timestamp,
    pub status: String,
    pub feedback: String,
    pub proof_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Task {
    pub fn status(&self) -> Result<TaskStatus, CoreError> {
        self.status.parse().map_err(CoreError::Internal)
    }
}

/// DTO for creating a task. The week number is assigned by the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTask {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub deadline: Timestamp,
}

/// DTO for patching a task. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub status: Option<TaskStatus>,
    pub feedback: Option<String>,
    pub proof_url: Option<String>,
}
