//! Daily attendance state machine and summary aggregation.
//!
//! An intern marks a day as `pending`; a manager resolves it to `present` or
//! `absent`. Once resolved an entry never returns to `pending`, although a
//! manager may flip a resolution (the latest confirmation wins).

use serde::Serialize;

use crate::error::TransitionError;

define_text_status! {
    /// Status of a single attendance entry.
    AttendanceStatus ("attendance") {
        Pending = "pending",
        Present = "present",
        Absent = "absent",
    }
}

impl AttendanceStatus {
    /// The status a confirmation decision resolves to.
    pub fn from_decision(confirmed: bool) -> Self {
        if confirmed {
            Self::Present
        } else {
            Self::Absent
        }
    }

    pub fn is_resolved(self) -> bool {
        self != Self::Pending
    }
}

/// Check whether an entry may move from `from` to `to`.
pub fn validate_transition(
    from: AttendanceStatus,
    to: AttendanceStatus,
) -> Result<(), TransitionError> {
    if from.is_resolved() && to == AttendanceStatus::Pending {
        return Err(TransitionError {
            entity: AttendanceStatus::ENTITY,
            from: from.as_str(),
            to: to.as_str(),
        });
    }
    Ok(())
}

/// Resolve an entry from a manager's decision.
pub fn resolve(
    current: AttendanceStatus,
    confirmed: bool,
) -> Result<AttendanceStatus, TransitionError> {
    let next = AttendanceStatus::from_decision(confirmed);
    validate_transition(current, next)?;
    Ok(next)
}

/// Per-status counts over an attendance history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AttendanceSummary {
    pub present: i64,
    pub absent: i64,
    pub pending: i64,
}

impl AttendanceSummary {
    pub fn from_statuses(statuses: impl IntoIterator<Item = AttendanceStatus>) -> Self {
        statuses.into_iter().fold(Self::default(), |mut acc, s| {
            acc.record(s, 1);
            acc
        })
    }

    /// Add `count` entries of `status`.
    pub fn record(&mut self, status: AttendanceStatus, count: i64) {
        match status {
            AttendanceStatus::Present => self.present += count,
            AttendanceStatus::Absent => self.absent += count,
            AttendanceStatus::Pending => self.pending += count,
        }
    }

    pub fn total(&self) -> i64 {
        self.present + self.absent + self.pending
    }

    /// Share of all entries marked present, as a percentage rounded to one
    /// decimal place. Zero when there is no history.
    pub fn present_percentage(&self) -> f64 {
        percentage(self.present, self.total())
    }

    pub fn absent_percentage(&self) -> f64 {
        percentage(self.absent, self.total())
    }
}

fn percentage(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 * 1000.0 / total as f64).round() / 10.0
}
