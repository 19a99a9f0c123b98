//! Handlers for `/interns`: public registration and the intern's own views.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use cohort_core::error::CoreError;
use cohort_core::types::DbId;
use cohort_db::models::assignment::AssignmentWithProject;
use cohort_db::models::document::DocumentInfo;
use cohort_db::models::notification::InternNotification;
use cohort_db::repositories::{AssignmentRepo, DocumentRepo, NotificationRepo};

use crate::error::{AppError, AppResult};
use crate::lifecycle::registration::{self, RegistrationRequest};
use crate::lifecycle::{intern_response, load_intern, InternResponse};
use crate::middleware::rbac::RequireIntern;
use crate::response::{DataResponse, FileResponse};
use crate::state::AppState;

/// POST /api/v1/interns/register
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegistrationRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<InternResponse>>)> {
    let intern = registration::register(&state, &input).await?;
    let data = intern_response(&state.pool, intern).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/interns/me
pub async fn me(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
) -> AppResult<Json<DataResponse<InternResponse>>> {
    let intern = load_intern(&state.pool, user.user_id).await?;
    let data = intern_response(&state.pool, intern).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/interns/me/assignments
pub async fn my_assignments(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
) -> AppResult<Json<DataResponse<Vec<AssignmentWithProject>>>> {
    let data = AssignmentRepo::list_for_intern(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/interns/me/documents
pub async fn my_documents(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
) -> AppResult<Json<DataResponse<Vec<DocumentInfo>>>> {
    let data = DocumentRepo::list_for_intern(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/interns/me/documents/{doc_id}
pub async fn download_document(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
    Path(doc_id): Path<DbId>,
) -> AppResult<FileResponse> {
    let document = DocumentRepo::find_for_intern(&state.pool, user.user_id, doc_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id: doc_id,
        }))?;
    let filename = match &document.reference_code {
        Some(code) => format!("{}-{code}.pdf", document.doc_type),
        None => format!("{}-{}.pdf", document.doc_type, document.id),
    };
    Ok(FileResponse {
        content_type: document.content_type,
        filename,
        bytes: document.content,
    })
}

/// GET /api/v1/interns/me/notifications
pub async fn my_notifications(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
) -> AppResult<Json<DataResponse<Vec<InternNotification>>>> {
    let data = NotificationRepo::list_for_intern(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/interns/me/notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    RequireIntern(user): RequireIntern,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if NotificationRepo::mark_read(&state.pool, user.user_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Notification",
            id,
        }))
    }
}
