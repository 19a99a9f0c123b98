//! Handlers for the attendance ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use cohort_core::types::DbId;
use cohort_db::models::attendance::{AttendanceEntry, PendingAttendance};
use cohort_db::repositories::AttendanceRepo;

use crate::error::AppResult;
use crate::lifecycle::attendance::{self, AttendanceHistory};
use crate::lifecycle::{ensure_can_manage, load_intern};
use crate::middleware::rbac::{RequireIntern, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// Body of `POST /attendance/{entry_id}/confirm`.
#[derive(Debug, Deserialize)]
pub struct ConfirmRequest {
    pub confirmed: bool,
}

/// POST /api/v1/interns/me/attendance
pub async fn mark_today(
    RequireIntern(user): RequireIntern,
    State(state): State<AppState>,
) -> AppResult<(StatusCode, Json<DataResponse<AttendanceEntry>>)> {
    let entry = attendance::mark_today(&state.pool, user.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// GET /api/v1/interns/me/attendance
pub async fn my_history(
    RequireIntern(user): RequireIntern,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<AttendanceHistory>>> {
    let data = attendance::history(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/interns/{id}/attendance
pub async fn intern_history(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
) -> AppResult<Json<DataResponse<AttendanceHistory>>> {
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, &user, intern_id).await?;
    let data = attendance::history(&state.pool, intern_id).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/manager/attendance/pending
///
/// Managers see entries of interns on their projects; admins see all.
pub async fn pending(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<PendingAttendance>>>> {
    let scope = if user.is_admin() { None } else { Some(user.user_id) };
    let data = AttendanceRepo::list_pending(&state.pool, scope).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/attendance/{entry_id}/confirm
pub async fn confirm(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(entry_id): Path<DbId>,
    Json(input): Json<ConfirmRequest>,
) -> AppResult<Json<DataResponse<AttendanceEntry>>> {
    let data = attendance::confirm(&state, &user, entry_id, input.confirmed).await?;
    Ok(Json(DataResponse { data }))
}
