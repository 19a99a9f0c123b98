//! Handlers for the `/admin` resource (admin only).

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use cohort_core::error::CoreError;
use cohort_core::letters::PDF_CONTENT_TYPE;
use cohort_core::roles::{ROLE_INTERN, ROLE_MANAGER};
use cohort_core::types::DbId;
use cohort_db::models::college::{College, UpsertCollege};
use cohort_db::models::outbox::OutboxSummary;
use cohort_db::models::user::UserResponse;
use cohort_db::repositories::{CollegeRepo, InternRepo, OutboxRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::lifecycle::accounts::{self, CreateManagerRequest};
use crate::lifecycle::activation::{self, ActivateRequest, ActivationResult};
use crate::lifecycle::attendance::{self, InternAttendanceSummary};
use crate::lifecycle::{deliver_now, intern_response, load_intern, required_text, InternResponse};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{InternListParams, OutboxListParams};
use crate::response::{DataResponse, FileResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Interns
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/interns?active=&limit=&offset=
pub async fn list_interns(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<InternListParams>,
) -> AppResult<Json<DataResponse<Vec<InternResponse>>>> {
    let limit = cohort_db::clamp_limit(params.limit, 50, 200);
    let offset = cohort_db::clamp_offset(params.offset);
    let interns = InternRepo::list(&state.pool, params.active, limit, offset).await?;

    let mut data = Vec::with_capacity(interns.len());
    for intern in interns {
        data.push(intern_response(&state.pool, intern).await?);
    }
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/interns/{id}
pub async fn get_intern(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<InternResponse>>> {
    let intern = load_intern(&state.pool, id).await?;
    let data = intern_response(&state.pool, intern).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/admin/interns/{id}
///
/// Hard delete; every intern-owned row cascades.
pub async fn delete_intern(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete_with_role(&state.pool, id, ROLE_INTERN).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Intern",
            id,
        }));
    }
    tracing::info!(intern_id = id, deleted_by = admin.user_id, "Intern deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/admin/interns/{id}/activate
pub async fn activate_intern(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ActivateRequest>,
) -> AppResult<Json<DataResponse<ActivationResult>>> {
    tracing::debug!(intern_id = id, admin_id = admin.user_id, "Activating intern");
    let data = activation::activate(&state, id, &input).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Managers
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/managers
pub async fn list_managers(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let managers = UserRepo::list_by_role(&state.pool, ROLE_MANAGER).await?;
    let data = managers.iter().map(UserResponse::from).collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/managers
pub async fn create_manager(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateManagerRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let manager = accounts::create_manager(&state, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: UserResponse::from(&manager),
        }),
    ))
}

/// DELETE /api/v1/admin/managers/{id}
///
/// Fails with 409 while the manager still owns projects.
pub async fn delete_manager(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !UserRepo::delete_with_role(&state.pool, id, ROLE_MANAGER).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Manager",
            id,
        }));
    }
    tracing::info!(manager_id = id, deleted_by = admin.user_id, "Manager deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// College directory
// ---------------------------------------------------------------------------

/// `GET /admin/colleges/lookup?name=`
#[derive(Debug, Deserialize)]
pub struct CollegeLookupParams {
    pub name: String,
}

/// GET /api/v1/admin/colleges
pub async fn list_colleges(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<College>>>> {
    let data = CollegeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/colleges/lookup?name=
pub async fn lookup_college(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<CollegeLookupParams>,
) -> AppResult<Json<DataResponse<College>>> {
    let data = CollegeRepo::find_by_name(&state.pool, &params.name)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "College",
                key: params.name.clone(),
            })
        })?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/admin/colleges
pub async fn upsert_college(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<UpsertCollege>,
) -> AppResult<Json<DataResponse<College>>> {
    let input = UpsertCollege {
        name: required_text(&input.name, "name")?.to_string(),
        contact_name: required_text(&input.contact_name, "contact_name")?.to_string(),
    };
    let data = CollegeRepo::upsert(&state.pool, &input).await?;
    Ok(Json(DataResponse { data }))
}

// ---------------------------------------------------------------------------
// Email outbox
// ---------------------------------------------------------------------------

/// Delivery state of an outbox entry after a retry.
#[derive(Debug, Serialize)]
pub struct RetryResult {
    pub id: DbId,
    pub status: String,
}

/// GET /api/v1/admin/outbox?status=&limit=&offset=
pub async fn list_outbox(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<OutboxListParams>,
) -> AppResult<Json<DataResponse<Vec<OutboxSummary>>>> {
    let limit = cohort_db::clamp_limit(params.limit, 50, 200);
    let offset = cohort_db::clamp_offset(params.offset);
    let data = OutboxRepo::list(&state.pool, params.status.as_deref(), limit, offset).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/admin/outbox/{id}/retry
///
/// Attempts delivery regardless of how many attempts the entry has used and
/// reports the entry's status afterwards.
pub async fn retry_outbox_entry(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<RetryResult>>> {
    let entry = OutboxRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "OutboxEntry",
            id,
        }))?;
    deliver_now(&state.outbox, &entry).await?;
    let status = OutboxRepo::find_by_id(&state.pool, id)
        .await?
        .map_or(entry.status, |row| row.status);
    Ok(Json(DataResponse {
        data: RetryResult { id, status },
    }))
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/reports/attendance
pub async fn attendance_report(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<InternAttendanceSummary>>>> {
    let data = attendance::all_summaries(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/admin/reports/attendance.pdf
pub async fn attendance_report_pdf(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<FileResponse> {
    let bytes = attendance::report_pdf(&state).await?;
    Ok(FileResponse {
        content_type: PDF_CONTENT_TYPE.to_string(),
        filename: format!(
            "attendance-report-{}.pdf",
            cohort_core::calendar::ist_today()
        ),
        bytes,
    })
}
