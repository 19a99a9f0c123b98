//! Interview slot rules applied at registration.
//!
//! A candidate may only pick an interview that, localized to IST, falls on a
//! weekday, is not a holiday, and starts within the `[11:00, 17:00)` window.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate, Timelike, Weekday};

use crate::calendar::to_ist;
use crate::types::Timestamp;

/// First IST hour at which an interview may start.
pub const INTERVIEW_FIRST_HOUR: u32 = 11;

/// IST hour at which the interview window closes (exclusive).
pub const INTERVIEW_END_HOUR: u32 = 17;

/// Holidays observed every year as `(month, day)`.
pub const ANNUAL_HOLIDAYS: &[(u32, u32)] = &[(1, 26), (8, 15), (10, 2), (12, 25)];

/// Why an interview choice was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterviewSlotError {
    #[error("Interviews cannot be scheduled on {0}")]
    DisallowedInterviewDay(Weekday),

    #[error("Interviews cannot be scheduled on the holiday {0}")]
    DisallowedInterviewHoliday(NaiveDate),

    #[error("Interviews must start between 11:00 and 17:00 IST (got {0}:00)")]
    DisallowedInterviewHour(u32),
}

/// Fixed set of dates on which no interviews are held.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    annual: Vec<(u32, u32)>,
    dates: BTreeSet<NaiveDate>,
}

impl HolidayCalendar {
    /// Calendar with only the [`ANNUAL_HOLIDAYS`].
    pub fn standard() -> Self {
        Self {
            annual: ANNUAL_HOLIDAYS.to_vec(),
            dates: BTreeSet::new(),
        }
    }

    /// Add one-off holiday dates.
    pub fn with_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.dates.extend(dates);
        self
    }

    /// Parse a comma-separated list of `YYYY-MM-DD` dates.
    ///
    /// Blank entries are skipped so a trailing comma is harmless.
    pub fn parse_dates(list: &str) -> Result<Vec<NaiveDate>, String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|e| format!("Invalid holiday date '{s}': {e}"))
            })
            .collect()
    }

    pub fn is_holiday(&self, day: NaiveDate) -> bool {
        self.dates.contains(&day)
            || self
                .annual
                .iter()
                .any(|&(month, dom)| day.month() == month && day.day() == dom)
    }
}

/// Check an interview choice against the weekday, holiday and hour rules.
///
/// Rules are evaluated in that order, so a Saturday holiday reports the
/// weekday violation.
pub fn validate_interview_slot(
    at: Timestamp,
    holidays: &HolidayCalendar,
) -> Result<(), InterviewSlotError> {
    let local = to_ist(at);
    let weekday = local.weekday();
    if matches!(weekday, Weekday::Sat | Weekday::Sun) {
        return Err(InterviewSlotError::DisallowedInterviewDay(weekday));
    }

    let day = local.date_naive();
    if holidays.is_holiday(day) {
        return Err(InterviewSlotError::DisallowedInterviewHoliday(day));
    }

    let hour = local.hour();
    if !(INTERVIEW_FIRST_HOUR..INTERVIEW_END_HOUR).contains(&hour) {
        return Err(InterviewSlotError::DisallowedInterviewHour(hour));
    }

    Ok(())
}
