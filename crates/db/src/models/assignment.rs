//! Assignment entity model and DTOs.
//!
//! `assignments` is the only record of which intern works on which project;
//! "projects of an intern" and "interns of a project" are both queries over it.

use chrono::NaiveDate;
use cohort_core::assignment::AssignmentStatus;
use cohort_core::error::CoreError;
use cohort_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assignments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Assignment {
    pub id: DbId,
    pub intern_id: DbId,
    pub project_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub feedback: Option<String>,
    pub assigned_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Assignment {
    /// Parsed status; a value outside the check constraint is an internal error.
    pub fn status(&self) -> Result<AssignmentStatus, CoreError> {
        self.status.parse().map_err(CoreError::Internal)
    }
}

/// An assignment joined with its project's title and manager.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssignmentWithProject {
    pub id: DbId,
    pub intern_id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub manager_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub feedback: Option<String>,
    pub assigned_at: Timestamp,
}

/// An assignment joined with the intern's name, for a project's roster.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectIntern {
    pub assignment_id: DbId,
    pub intern_id: DbId,
    pub full_name: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub feedback: Option<String>,
}

/// DTO for creating an assignment.
#[derive(Debug, Clone)]
pub struct CreateAssignment {
    pub intern_id: DbId,
    pub project_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// DTO for patching an assignment. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssignment {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
    pub feedback: Option<String>,
}
