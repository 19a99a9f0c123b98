//! Intern profile model and DTOs.
//!
//! An intern is a `users` row with `role = 'intern'` plus one
//! `intern_profiles` row holding the registration details.

use chrono::NaiveDate;
use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A user row joined with its intern profile.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Intern {
    pub id: DbId,
    pub full_name: String,
    pub email: String,
    pub is_active: bool,
    pub is_email_verified: bool,
    pub phone: String,
    pub college: String,
    pub course: String,
    pub department: String,
    pub semester: String,
    pub ref_no: String,
    pub interview_at: Timestamp,
    pub recommendation_ref: String,
    pub college_id_ref: String,
    pub internship_start: Option<NaiveDate>,
    pub internship_end: Option<NaiveDate>,
    pub activated_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for the profile half of a registration.
#[derive(Debug, Clone)]
pub struct CreateInternProfile {
    pub phone: String,
    pub college: String,
    pub course: String,
    pub department: String,
    pub semester: String,
    pub ref_no: String,
    pub interview_at: Timestamp,
    pub recommendation_ref: String,
    pub college_id_ref: String,
}
