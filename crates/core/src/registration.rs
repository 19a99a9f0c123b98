//! Candidate registration validation.
//!
//! Registration is public, so every field is checked here before anything is
//! written: presence first, then phone and email shape, then the interview
//! slot rules from [`crate::interview`].

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::interview::{validate_interview_slot, HolidayCalendar, InterviewSlotError};
use crate::types::Timestamp;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{10}$").expect("valid regex"));

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Borrowed view of the fields a candidate submits.
#[derive(Debug, Clone, Copy)]
pub struct CandidateDetails<'a> {
    pub full_name: &'a str,
    pub college: &'a str,
    pub course: &'a str,
    pub department: &'a str,
    pub semester: &'a str,
    pub ref_no: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub interview: Option<Timestamp>,
    pub recommendation: &'a str,
    pub college_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Phone number must be exactly 10 digits")]
    InvalidPhoneFormat,

    #[error("Email address is not valid")]
    InvalidEmailFormat,

    #[error(transparent)]
    Interview(#[from] InterviewSlotError),
}

impl From<RegistrationError> for CoreError {
    fn from(err: RegistrationError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Validate a registration and return the accepted interview timestamp.
pub fn validate_registration(
    details: &CandidateDetails<'_>,
    holidays: &HolidayCalendar,
) -> Result<Timestamp, RegistrationError> {
    let required = [
        ("fullName", details.full_name),
        ("college", details.college),
        ("course", details.course),
        ("department", details.department),
        ("semester", details.semester),
        ("refNo", details.ref_no),
        ("email", details.email),
        ("phone", details.phone),
        ("recommendation", details.recommendation),
        ("collegeId", details.college_id),
    ];
    if let Some((name, _)) = required.iter().find(|(_, v)| v.trim().is_empty()) {
        return Err(RegistrationError::MissingField(*name));
    }
    let interview = details
        .interview
        .ok_or(RegistrationError::MissingField("interview"))?;

    if !is_valid_phone(details.phone.trim()) {
        return Err(RegistrationError::InvalidPhoneFormat);
    }
    if !is_valid_email(details.email.trim()) {
        return Err(RegistrationError::InvalidEmailFormat);
    }

    validate_interview_slot(interview, holidays)?;
    Ok(interview)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{DateTime, Utc};

    fn wednesday_1pm() -> Timestamp {
        DateTime::parse_from_rfc3339("2026-03-04T13:00:00+05:30")
            .unwrap()
            .with_timezone(&Utc)
    }

    fn valid() -> CandidateDetails<'static> {
        CandidateDetails {
            full_name: "Asha Rao",
            college: "Govt. Engineering College",
            course: "B.Tech",
            department: "CSE",
            semester: "6",
            ref_no: "GEC/2026/114",
            email: "asha@example.com",
            phone: "9876543210",
            interview: Some(wednesday_1pm()),
            recommendation: "uploads/rec-114.pdf",
            college_id: "uploads/id-114.jpg",
        }
    }

    #[test]
    fn complete_details_pass() {
        let at = validate_registration(&valid(), &HolidayCalendar::standard()).unwrap();
        assert_eq!(at, wednesday_1pm());
    }

    #[test]
    fn five_digit_phone_is_rejected() {
        let details = CandidateDetails {
            phone: "12345",
            ..valid()
        };
        assert_eq!(
            validate_registration(&details, &HolidayCalendar::standard()),
            Err(RegistrationError::InvalidPhoneFormat)
        );
    }

    #[test]
    fn phone_with_letters_is_rejected() {
        let details = CandidateDetails {
            phone: "98765abcde",
            ..valid()
        };
        assert_eq!(
            validate_registration(&details, &HolidayCalendar::standard()),
            Err(RegistrationError::InvalidPhoneFormat)
        );
    }

    #[test]
    fn malformed_email_is_rejected() {
        for email in ["asha", "asha@example", "a sha@example.com"] {
            let details = CandidateDetails { email, ..valid() };
            assert_eq!(
                validate_registration(&details, &HolidayCalendar::standard()),
                Err(RegistrationError::InvalidEmailFormat),
                "{email} should be rejected"
            );
        }
    }

    #[test]
    fn blank_field_is_reported_by_name() {
        let details = CandidateDetails {
            department: "   ",
            ..valid()
        };
        assert_eq!(
            validate_registration(&details, &HolidayCalendar::standard()),
            Err(RegistrationError::MissingField("department"))
        );
    }

    #[test]
    fn missing_interview_is_reported() {
        let details = CandidateDetails {
            interview: None,
            ..valid()
        };
        assert_eq!(
            validate_registration(&details, &HolidayCalendar::standard()),
            Err(RegistrationError::MissingField("interview"))
        );
    }

    #[test]
    fn interview_rules_are_applied() {
        let saturday = DateTime::parse_from_rfc3339("2026-03-07T14:00:00+05:30")
            .unwrap()
            .with_timezone(&Utc);
        let details = CandidateDetails {
            interview: Some(saturday),
            ..valid()
        };
        assert_matches!(
            validate_registration(&details, &HolidayCalendar::standard()),
            Err(RegistrationError::Interview(
                InterviewSlotError::DisallowedInterviewDay(_)
            ))
        );
    }

    #[test]
    fn converts_to_validation_error() {
        let err: CoreError = RegistrationError::InvalidPhoneFormat.into();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("10 digits"));
    }
}
