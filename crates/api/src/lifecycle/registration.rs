//! Public candidate registration.

use serde::Deserialize;

use cohort_core::error::CoreError;
use cohort_core::notify::interview_confirmation;
use cohort_core::registration::{validate_registration, CandidateDetails};
use cohort_core::roles::ROLE_INTERN;
use cohort_core::types::Timestamp;
use cohort_db::models::intern::{CreateInternProfile, Intern};
use cohort_db::models::outbox::kinds;
use cohort_db::models::user::CreateUser;
use cohort_db::repositories::{InternRepo, OutboxRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /interns/register`.
///
/// Every field defaults to empty so a missing field is reported by name
/// instead of failing deserialization.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationRequest {
    pub full_name: String,
    pub college: String,
    pub course: String,
    pub department: String,
    pub semester: String,
    pub ref_no: String,
    pub email: String,
    pub phone: String,
    /// Chosen interview date and time; any UTC offset is accepted.
    pub interview: Option<Timestamp>,
    /// Reference to the uploaded recommendation letter.
    pub recommendation: String,
    /// Reference to the uploaded college identity card.
    pub college_id: String,
}

/// Register a candidate as an inactive intern.
///
/// The interview confirmation is queued in the same transaction and sent in
/// the background; a delivery failure never fails the registration.
pub async fn register(state: &AppState, req: &RegistrationRequest) -> AppResult<Intern> {
    let details = CandidateDetails {
        full_name: &req.full_name,
        college: &req.college,
        course: &req.course,
        department: &req.department,
        semester: &req.semester,
        ref_no: &req.ref_no,
        email: &req.email,
        phone: &req.phone,
        interview: req.interview,
        recommendation: &req.recommendation,
        college_id: &req.college_id,
    };
    let interview_at = validate_registration(&details, &state.config.holidays)?;

    let email = req.email.trim().to_lowercase();
    if UserRepo::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(
            "An account with this email already exists".into(),
        )));
    }

    let mut tx = state.pool.begin().await?;

    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            role: ROLE_INTERN.to_string(),
            full_name: req.full_name.trim().to_string(),
            email,
            password_hash: None,
            is_active: false,
        },
    )
    .await?;

    InternRepo::create_profile(
        &mut *tx,
        user.id,
        &CreateInternProfile {
            phone: req.phone.trim().to_string(),
            college: req.college.trim().to_string(),
            course: req.course.trim().to_string(),
            department: req.department.trim().to_string(),
            semester: req.semester.trim().to_string(),
            ref_no: req.ref_no.trim().to_string(),
            interview_at,
            recommendation_ref: req.recommendation.trim().to_string(),
            college_id_ref: req.college_id.trim().to_string(),
        },
    )
    .await?;

    let entry = OutboxRepo::enqueue(
        &mut *tx,
        Some(user.id),
        kinds::INTERVIEW_CONFIRMATION,
        &interview_confirmation(&user.email, &user.full_name, interview_at),
    )
    .await?;

    let intern = InternRepo::find_by_id(&mut *tx, user.id)
        .await?
        .ok_or_else(|| CoreError::Internal(format!("Profile for user {} missing", user.id)))?;

    tx.commit().await?;

    tracing::info!(intern_id = intern.id, %interview_at, "Candidate registered");

    let outbox = state.outbox.clone();
    tokio::spawn(async move {
        if let Err(e) = outbox.deliver(&entry).await {
            tracing::warn!(entry_id = entry.id, error = %e, "Interview confirmation left in outbox");
        }
    });

    Ok(intern)
}
