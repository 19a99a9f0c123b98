//! Public verification of issued letters by reference code.

use axum::extract::{Path, State};
use axum::Json;
use chrono::NaiveDate;
use serde::Serialize;

use cohort_core::error::CoreError;
use cohort_core::letters::PDF_CONTENT_TYPE;
use cohort_db::models::document::IssuedDocument;
use cohort_db::repositories::IssuedDocumentRepo;

use crate::error::{AppError, AppResult};
use crate::response::{DataResponse, FileResponse};
use crate::state::AppState;

/// What the public can learn about an issued letter.
#[derive(Debug, Serialize)]
pub struct VerificationResult {
    pub reference_code: String,
    pub doc_type: String,
    pub student_name: String,
    pub college_name: String,
    pub department: String,
    pub issue_date: NaiveDate,
}

async fn find(state: &AppState, code: &str) -> AppResult<IssuedDocument> {
    IssuedDocumentRepo::find_by_code(&state.pool, code.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Document",
                key: code.to_string(),
            })
        })
}

/// GET /api/v1/verify/{reference_code}
pub async fn verify(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<Json<DataResponse<VerificationResult>>> {
    let doc = find(&state, &code).await?;
    Ok(Json(DataResponse {
        data: VerificationResult {
            reference_code: doc.reference_code,
            doc_type: doc.doc_type,
            student_name: doc.student_name,
            college_name: doc.college_name,
            department: doc.department,
            issue_date: doc.issue_date,
        },
    }))
}

/// GET /api/v1/verify/{reference_code}/document
pub async fn document(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> AppResult<FileResponse> {
    let doc = find(&state, &code).await?;
    Ok(FileResponse {
        content_type: PDF_CONTENT_TYPE.to_string(),
        filename: format!("{}.pdf", doc.reference_code),
        bytes: doc.content,
    })
}
