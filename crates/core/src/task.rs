//! Weekly task status rules.
//!
//! `week_number` is a per-intern sequence counter (the n-th task created for
//! that intern), not an ISO calendar week.

use crate::error::TransitionError;

define_text_status! {
    /// Completion state of a task.
    TaskStatus ("task") {
        Pending = "pending",
        Completed = "completed",
    }
}

/// A completed task cannot be reopened.
pub fn validate_transition(from: TaskStatus, to: TaskStatus) -> Result<(), TransitionError> {
    if from == TaskStatus::Completed && to == TaskStatus::Pending {
        return Err(TransitionError {
            entity: TaskStatus::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
        });
    }
    Ok(())
}

/// Week number for the next task given how many the intern already has.
pub fn next_week_number(existing_tasks: i64) -> i32 {
    i32::try_from(existing_tasks + 1).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_can_complete() {
        assert!(validate_transition(TaskStatus::Pending, TaskStatus::Completed).is_ok());
    }

    #[test]
    fn completed_cannot_reopen() {
        let err = validate_transition(TaskStatus::Completed, TaskStatus::Pending).unwrap_err();
        assert_eq!(err.to_string(), "Invalid task status transition: completed -> pending");
    }

    #[test]
    fn same_status_is_a_no_op() {
        assert!(validate_transition(TaskStatus::Completed, TaskStatus::Completed).is_ok());
    }

    #[test]
    fn week_number_follows_count() {
        assert_eq!(next_week_number(0), 1);
        assert_eq!(next_week_number(4), 5);
    }
}
