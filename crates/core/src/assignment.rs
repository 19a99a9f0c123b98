//! Assignment status machine and window rules.
//!
//! An assignment binds one intern to one project for a date window. Status
//! only moves forward (`assigned -> in-progress -> completed`, skipping a
//! step is allowed) and `completed` is terminal.

use chrono::NaiveDate;

use crate::error::{CoreError, TransitionError};

define_text_status! {
    /// Progress of an intern on a project.
    ///
    /// `pending` is accepted as an input alias for `assigned`.
    AssignmentStatus ("assignment") {
        Assigned = "assigned" | "pending",
        InProgress = "in-progress" | "in_progress",
        Completed = "completed",
    }
}

impl AssignmentStatus {
    fn rank(self) -> u8 {
        match self {
            Self::Assigned => 0,
            Self::InProgress => 1,
            Self::Completed => 2,
        }
    }
}

/// Check whether an assignment may move from `from` to `to`.
///
/// Staying in the same status is always allowed.
pub fn validate_transition(
    from: AssignmentStatus,
    to: AssignmentStatus,
) -> Result<(), TransitionError> {
    if to.rank() >= from.rank() {
        Ok(())
    } else {
        Err(TransitionError {
            entity: AssignmentStatus::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
        })
    }
}

/// Reject windows whose end precedes their start.
pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::Validation(format!(
            "End date {end} cannot be before start date {start}"
        )));
    }
    Ok(())
}
