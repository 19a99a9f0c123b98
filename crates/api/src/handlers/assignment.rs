//! Handlers for intern assignments and internship completion.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use cohort_core::types::DbId;
use cohort_db::models::assignment::{Assignment, AssignmentWithProject, UpdateAssignment};
use cohort_db::repositories::AssignmentRepo;

use crate::error::AppResult;
use crate::lifecycle::assignments::{self, AssignRequest};
use crate::lifecycle::completion::{self, CompleteRequest, CompletionResult};
use crate::lifecycle::{ensure_can_manage, load_intern};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct RemovedAssignments {
    pub removed: u64,
}

/// POST /api/v1/interns/{id}/assignments
pub async fn assign(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Assignment>>)> {
    let assignment = assignments::assign(&state, &user, intern_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: assignment })))
}

/// GET /api/v1/interns/{id}/assignments
pub async fn list_for_intern(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<AssignmentWithProject>>>> {
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, &user, intern_id).await?;
    let data = AssignmentRepo::list_for_intern(&state.pool, intern_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/interns/{id}/assignments/by-project/{project_id}
pub async fn update_by_project(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((intern_id, project_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateAssignment>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let data =
        assignments::update_by_project(&state, &user, intern_id, project_id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/interns/{id}/assignments/by-project/{project_id}
pub async fn remove_by_project(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((intern_id, project_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<RemovedAssignments>>> {
    let removed = assignments::remove_by_project(&state, &user, intern_id, project_id).await?;
    Ok(Json(DataResponse {
        data: RemovedAssignments { removed },
    }))
}

/// PATCH /api/v1/assignments/{id}
pub async fn update(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAssignment>,
) -> AppResult<Json<DataResponse<Assignment>>> {
    let data = assignments::update_by_id(&state, &user, id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// DELETE /api/v1/assignments/{id}
pub async fn delete(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    assignments::delete_by_id(&state, &user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interns/{id}/complete
///
/// The body is optional; an empty request issues a completion letter.
pub async fn complete(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
    input: Option<Json<CompleteRequest>>,
) -> AppResult<Json<DataResponse<CompletionResult>>> {
    let input = input.map(|Json(req)| req).unwrap_or_default();
    let data = completion::complete(&state, &user, intern_id, &input).await?;
    Ok(Json(DataResponse { data }))
}
