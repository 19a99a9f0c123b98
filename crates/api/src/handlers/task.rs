//! Handlers for the weekly task board.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use cohort_core::types::DbId;
use cohort_db::models::task::{CreateTask, Task, UpdateTask};
use cohort_db::repositories::TaskRepo;

use crate::error::AppResult;
use crate::lifecycle::tasks::{self, InternTaskUpdate};
use crate::lifecycle::{ensure_can_manage, load_intern};
use crate::middleware::rbac::{RequireIntern, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/interns/{id}/tasks
pub async fn create(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<Task>>)> {
    let task = tasks::create(&state, &user, intern_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: task })))
}

/// GET /api/v1/interns/{id}/tasks
pub async fn list_for_intern(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(intern_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, &user, intern_id).await?;
    let data = TaskRepo::list_for_intern(&state.pool, intern_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/interns/{id}/tasks/{task_id}
pub async fn update(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path((intern_id, task_id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<Task>>> {
    let data = tasks::update_by_staff(&state, &user, intern_id, task_id, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/interns/me/tasks
pub async fn my_tasks(
    RequireIntern(user): RequireIntern,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Task>>>> {
    let data = TaskRepo::list_for_intern(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data }))
}

/// PATCH /api/v1/interns/me/tasks/{task_id}
pub async fn update_mine(
    RequireIntern(user): RequireIntern,
    State(state): State<AppState>,
    Path(task_id): Path<DbId>,
    Json(input): Json<InternTaskUpdate>,
) -> AppResult<Json<DataResponse<Task>>> {
    let data = tasks::update_by_intern(&state, user.user_id, task_id, &input).await?;
    Ok(Json(DataResponse { data }))
}
