//! Attendance entry model.

use chrono::NaiveDate;
use cohort_core::attendance::AttendanceStatus;
use cohort_core::error::CoreError;
use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `attendance` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AttendanceEntry {
    pub id: DbId,
    pub intern_id: DbId,
    /// IST calendar day the entry covers.
    pub attendance_date: NaiveDate,
    pub status: String,
    pub project_id: Option<DbId>,
    pub requested_at: Timestamp,
    pub approved_at: Option<Timestamp>,
    pub approved_by: Option<DbId>,
}

impl AttendanceEntry {
    pub fn status(&self) -> Result<AttendanceStatus, CoreError> {
        self.status.parse().map_err(CoreError::Internal)
    }
}

/// A pending entry with the intern's name, for a manager's review queue.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PendingAttendance {
    pub id: DbId,
    pub intern_id: DbId,
    pub intern_name: String,
    pub attendance_date: NaiveDate,
    pub project_id: Option<DbId>,
    pub requested_at: Timestamp,
}

/// Per-intern status counts for reporting.
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceCounts {
    pub intern_id: DbId,
    pub full_name: String,
    pub email: String,
    pub present: i64,
    pub absent: i64,
    pub pending: i64,
}
