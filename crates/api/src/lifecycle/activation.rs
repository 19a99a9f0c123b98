//! Activation: credential, offer letter, archive record and activation email.
//!
//! The offer letter is rendered before anything is written, so a renderer
//! failure leaves the intern untouched. Every write then happens in one
//! transaction. Email delivery runs after commit; if it fails the intern stays
//! active and the email stays queued in the outbox.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use cohort_core::assignment::validate_window;
use cohort_core::calendar::ist_today;
use cohort_core::credentials::generate_temp_credential;
use cohort_core::error::CoreError;
use cohort_core::letters::{OfferLetter, DOC_OFFER_LETTER, PDF_CONTENT_TYPE};
use cohort_core::notify::{activation_email, EmailAttachment};
use cohort_core::types::DbId;
use cohort_db::models::document::{CreateInternDocument, CreateIssuedDocument, DocumentInfo};
use cohort_db::models::outbox::kinds;
use cohort_db::repositories::{
    DocumentRepo, InternRepo, IssuedDocumentRepo, NotificationRepo, OutboxRepo, UserRepo,
};

use super::{college_contact, deliver_now, intern_response, load_intern, InternResponse};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Body of `POST /admin/interns/{id}/activate`.
#[derive(Debug, Deserialize)]
pub struct ActivateRequest {
    pub internship_start: NaiveDate,
    pub internship_end: NaiveDate,
    /// Postal line printed under the college name on the letter.
    #[serde(default)]
    pub address_line: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ActivationResult {
    pub intern: InternResponse,
    pub document: DocumentInfo,
    pub reference_code: String,
}

fn already_active() -> AppError {
    AppError::Core(CoreError::Conflict("Intern is already active".into()))
}

pub async fn activate(
    state: &AppState,
    intern_id: DbId,
    req: &ActivateRequest,
) -> AppResult<ActivationResult> {
    let intern = load_intern(&state.pool, intern_id).await?;
    if intern.is_active {
        return Err(already_active());
    }
    validate_window(req.internship_start, req.internship_end)?;

    let letter = OfferLetter {
        college_name: intern.college.clone(),
        contact_name: college_contact(&state.pool, &intern.college).await?,
        address_line: req.address_line.clone().unwrap_or_default(),
        department: intern.department.clone(),
        semester: intern.semester.clone(),
        ref_no: intern.ref_no.clone(),
        start_date: req.internship_start,
        end_date: req.internship_end,
        student_name: intern.full_name.clone(),
        issued_on: ist_today(),
    };
    let rendered = state.renderer.render_offer_letter(&letter).await?;

    let temp_credential = generate_temp_credential();
    let password_hash = hash_password(&temp_credential)
        .map_err(|e| AppError::InternalError(format!("Credential hashing error: {e}")))?;

    let mut tx = state.pool.begin().await?;

    // Guarded on is_active, so a concurrent activation loses here.
    UserRepo::activate(&mut *tx, intern.id, &password_hash)
        .await?
        .ok_or_else(already_active)?;

    InternRepo::set_internship_window(&mut *tx, intern.id, req.internship_start, req.internship_end)
        .await?;

    let document = DocumentRepo::create(
        &mut *tx,
        &CreateInternDocument {
            intern_id: intern.id,
            doc_type: DOC_OFFER_LETTER.to_string(),
            content_type: PDF_CONTENT_TYPE.to_string(),
            content: rendered.bytes.clone(),
            reference_code: Some(rendered.reference_code.clone()),
        },
    )
    .await?;

    IssuedDocumentRepo::create(
        &mut *tx,
        &CreateIssuedDocument {
            reference_code: rendered.reference_code.clone(),
            intern_id: intern.id,
            doc_type: DOC_OFFER_LETTER.to_string(),
            student_name: intern.full_name.clone(),
            college_name: intern.college.clone(),
            department: intern.department.clone(),
            issue_date: letter.issued_on,
            content: rendered.bytes.clone(),
        },
    )
    .await?;

    NotificationRepo::create(
        &mut *tx,
        intern.id,
        "Internship confirmed",
        "Your offer letter is available under Documents.",
    )
    .await?;

    let email = activation_email(
        &intern.email,
        &intern.full_name,
        &temp_credential,
        EmailAttachment {
            filename: format!("offer-letter-{}.pdf", rendered.reference_code),
            content_type: PDF_CONTENT_TYPE.to_string(),
            bytes: rendered.bytes,
        },
    );
    let entry = OutboxRepo::enqueue(&mut *tx, Some(intern.id), kinds::ACTIVATION, &email).await?;

    tx.commit().await?;

    tracing::info!(
        intern_id = intern.id,
        reference_code = %rendered.reference_code,
        "Intern activated"
    );

    deliver_now(&state.outbox, &entry).await?;

    let intern = load_intern(&state.pool, intern.id).await?;
    Ok(ActivationResult {
        intern: intern_response(&state.pool, intern).await?,
        document,
        reference_code: rendered.reference_code,
    })
}
