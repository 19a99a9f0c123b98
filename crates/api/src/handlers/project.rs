//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use cohort_core::assignment::validate_window;
use cohort_core::error::CoreError;
use cohort_core::roles::ROLE_MANAGER;
use cohort_core::types::DbId;
use cohort_db::models::assignment::ProjectIntern;
use cohort_db::models::project::{CreateProject, Project, UpdateProject};
use cohort_db::repositories::{AssignmentRepo, ProjectRepo, UserRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::lifecycle::required_text;
use crate::middleware::rbac::{RequireAdmin, RequireManager};
use crate::response::DataResponse;
use crate::state::AppState;

/// A project with the interns assigned to it.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub interns: Vec<ProjectIntern>,
}

fn project_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Project",
        id,
    })
}

async fn ensure_manager_account(pool: &PgPool, manager_id: DbId) -> AppResult<()> {
    match UserRepo::find_by_id(pool, manager_id).await? {
        Some(user) if user.role == ROLE_MANAGER => Ok(()),
        _ => Err(AppError::Core(CoreError::Validation(format!(
            "User {manager_id} is not a manager"
        )))),
    }
}

/// POST /api/v1/projects
pub async fn create(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    required_text(&input.title, "title")?;
    validate_window(input.start_date, input.end_date)?;
    ensure_manager_account(&state.pool, input.manager_id).await?;

    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, manager_id = project.manager_id, "Project created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects
///
/// Admins see every project; managers see their own.
pub async fn list(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let data = if user.is_admin() {
        ProjectRepo::list(&state.pool).await?
    } else {
        ProjectRepo::list_by_manager(&state.pool, user.user_id).await?
    };
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    if !user.is_admin() && project.manager_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Project belongs to another manager".into(),
        )));
    }
    let interns = AssignmentRepo::list_for_project(&state.pool, id).await?;
    Ok(Json(DataResponse {
        data: ProjectDetail { project, interns },
    }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    let current = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    if let Some(title) = &input.title {
        required_text(title, "title")?;
    }
    validate_window(
        input.start_date.unwrap_or(current.start_date),
        input.end_date.unwrap_or(current.end_date),
    )?;
    if let Some(manager_id) = input.manager_id {
        ensure_manager_account(&state.pool, manager_id).await?;
    }

    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| project_not_found(id))?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}
///
/// Assignments to the project are removed with it.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProjectRepo::delete(&state.pool, id).await? {
        tracing::info!(project_id = id, "Project deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(project_not_found(id))
    }
}
