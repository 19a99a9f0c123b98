//! Internship completion.
//!
//! Closes every open assignment, records `completed_at` and, unless asked not
//! to, issues a completion letter that is stored, archived for verification
//! and emailed. A failed email does not fail the completion; the response
//! reports it through `notification_pending`.

use serde::{Deserialize, Serialize};

use cohort_core::calendar::ist_today;
use cohort_core::error::CoreError;
use cohort_core::letters::{CompletionLetter, DOC_COMPLETION_LETTER, PDF_CONTENT_TYPE};
use cohort_core::notify::{completion_email, EmailAttachment};
use cohort_core::types::DbId;
use cohort_db::models::document::{CreateInternDocument, CreateIssuedDocument, DocumentInfo};
use cohort_db::models::outbox::kinds;
use cohort_db::repositories::{
    AssignmentRepo, DocumentRepo, InternRepo, IssuedDocumentRepo, NotificationRepo, OutboxRepo,
};
use cohort_events::DispatchError;

use super::{college_contact, ensure_can_manage, intern_response, load_intern, InternResponse};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `POST /interns/{id}/complete`.
#[derive(Debug, Deserialize)]
pub struct CompleteRequest {
    #[serde(default = "default_issue_letter")]
    pub issue_letter: bool,
    #[serde(default)]
    pub address_line: Option<String>,
}

impl Default for CompleteRequest {
    fn default() -> Self {
        Self {
            issue_letter: true,
            address_line: None,
        }
    }
}

fn default_issue_letter() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct CompletionResult {
    pub intern: InternResponse,
    pub assignments_completed: u64,
    pub document: Option<DocumentInfo>,
    pub reference_code: Option<String>,
}

pub async fn complete(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    req: &CompleteRequest,
) -> AppResult<CompletionResult> {
    let intern = load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, actor, intern_id).await?;
    if !intern.is_active {
        return Err(CoreError::Conflict("Intern has not been activated".into()).into());
    }
    if intern.completed_at.is_some() {
        return Err(CoreError::Conflict("Internship is already completed".into()).into());
    }

    let letter = if req.issue_letter {
        let (start_date, end_date) = intern
            .internship_start
            .zip(intern.internship_end)
            .ok_or_else(|| {
                CoreError::Internal(format!("Active intern {intern_id} has no internship window"))
            })?;
        let mut project_titles: Vec<String> = Vec::new();
        for assignment in AssignmentRepo::list_for_intern(&state.pool, intern_id).await? {
            if !project_titles.contains(&assignment.project_title) {
                project_titles.push(assignment.project_title);
            }
        }

        let letter = CompletionLetter {
            college_name: intern.college.clone(),
            contact_name: college_contact(&state.pool, &intern.college).await?,
            address_line: req.address_line.clone().unwrap_or_default(),
            department: intern.department.clone(),
            semester: intern.semester.clone(),
            ref_no: intern.ref_no.clone(),
            start_date,
            end_date,
            student_name: intern.full_name.clone(),
            project_titles,
            issued_on: ist_today(),
        };
        let rendered = state.renderer.render_completion_letter(&letter).await?;
        Some((letter.issued_on, rendered))
    } else {
        None
    };

    let mut tx = state.pool.begin().await?;

    let assignments_completed = AssignmentRepo::complete_open_for_intern(&mut *tx, intern_id).await?;
    InternRepo::mark_completed(&mut *tx, intern_id).await?;

    let mut document = None;
    let mut reference_code = None;
    let mut entry = None;
    if let Some((issued_on, rendered)) = letter {
        document = Some(
            DocumentRepo::create(
                &mut *tx,
                &CreateInternDocument {
                    intern_id,
                    doc_type: DOC_COMPLETION_LETTER.to_string(),
                    content_type: PDF_CONTENT_TYPE.to_string(),
                    content: rendered.bytes.clone(),
                    reference_code: Some(rendered.reference_code.clone()),
                },
            )
            .await?,
        );
        IssuedDocumentRepo::create(
            &mut *tx,
            &CreateIssuedDocument {
                reference_code: rendered.reference_code.clone(),
                intern_id,
                doc_type: DOC_COMPLETION_LETTER.to_string(),
                student_name: intern.full_name.clone(),
                college_name: intern.college.clone(),
                department: intern.department.clone(),
                issue_date: issued_on,
                content: rendered.bytes.clone(),
            },
        )
        .await?;
        let email = completion_email(
            &intern.email,
            &intern.full_name,
            EmailAttachment {
                filename: format!("completion-letter-{}.pdf", rendered.reference_code),
                content_type: PDF_CONTENT_TYPE.to_string(),
                bytes: rendered.bytes,
            },
        );
        entry = Some(OutboxRepo::enqueue(&mut *tx, Some(intern_id), kinds::COMPLETION, &email).await?);
        reference_code = Some(rendered.reference_code);
    }

    NotificationRepo::create(
        &mut *tx,
        intern_id,
        "Internship completed",
        "Congratulations on completing your internship.",
    )
    .await?;

    tx.commit().await?;

    tracing::info!(
        intern_id,
        assignments_completed,
        completed_by = actor.user_id,
        "Internship completed"
    );

    if let Some(entry) = &entry {
        match state.outbox.deliver(entry).await {
            Ok(_) | Err(DispatchError::Delivery { .. }) => {}
            Err(DispatchError::Database(e)) => return Err(e.into()),
        }
    }

    let intern = load_intern(&state.pool, intern_id).await?;
    Ok(CompletionResult {
        intern: intern_response(&state.pool, intern).await?,
        assignments_completed,
        document,
        reference_code,
    })
}
