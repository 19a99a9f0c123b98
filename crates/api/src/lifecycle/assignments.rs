//! Project assignments.
//!
//! Every assignment has its own id and that is the primary address. The
//! project-keyed forms address the oldest matching assignment (update) or
//! every matching assignment (remove), since one intern may be assigned to
//! the same project more than once.

use chrono::NaiveDate;
use serde::Deserialize;

use cohort_core::assignment::{validate_transition, validate_window};
use cohort_core::error::CoreError;
use cohort_core::types::DbId;
use cohort_db::models::assignment::{Assignment, CreateAssignment, UpdateAssignment};
use cohort_db::repositories::{AssignmentRepo, NotificationRepo, ProjectRepo};

use super::{ensure_can_manage, load_intern, required};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `POST /interns/{id}/assignments`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct AssignRequest {
    pub project_id: Option<DbId>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

fn assignment_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Assignment",
        id,
    })
}

pub async fn assign(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    req: &AssignRequest,
) -> AppResult<Assignment> {
    let project_id = required(req.project_id, "project_id")?;
    let start_date = required(req.start_date, "start_date")?;
    let end_date = required(req.end_date, "end_date")?;

    let intern = load_intern(&state.pool, intern_id).await?;
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }))?;
    if !actor.is_admin() && project.manager_id != actor.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You can only assign interns to your own projects".into(),
        )));
    }
    validate_window(start_date, end_date)?;

    let mut tx = state.pool.begin().await?;
    let assignment = AssignmentRepo::create(
        &mut *tx,
        &CreateAssignment {
            intern_id: intern.id,
            project_id,
            start_date,
            end_date,
        },
    )
    .await?;
    NotificationRepo::create(
        &mut *tx,
        intern.id,
        "New project assignment",
        &format!(
            "You have been assigned to {} from {start_date} to {end_date}.",
            project.title
        ),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(
        assignment_id = assignment.id,
        intern_id,
        project_id,
        "Intern assigned to project"
    );
    Ok(assignment)
}

/// Merge a patch into an assignment, enforcing the window and status rules.
pub fn apply_patch(current: &Assignment, patch: &UpdateAssignment) -> AppResult<Assignment> {
    if patch.start_date.is_none()
        && patch.end_date.is_none()
        && patch.status.is_none()
        && patch.feedback.is_none()
    {
        return Err(AppError::Core(CoreError::Validation(
            "At least one of start_date, end_date, status or feedback is required".into(),
        )));
    }

    let mut next = current.clone();
    if let Some(start) = patch.start_date {
        next.start_date = start;
    }
    if let Some(end) = patch.end_date {
        next.end_date = end;
    }
    validate_window(next.start_date, next.end_date)?;

    if let Some(status) = patch.status {
        validate_transition(current.status()?, status)?;
        next.status = status.as_str().to_string();
    }
    if let Some(feedback) = &patch.feedback {
        next.feedback = Some(feedback.clone());
    }
    Ok(next)
}

async fn save(state: &AppState, current: &Assignment, patch: &UpdateAssignment) -> AppResult<Assignment> {
    let next = apply_patch(current, patch)?;
    let Some(saved) = AssignmentRepo::update(&state.pool, &next, &current.status).await? else {
        return match AssignmentRepo::find_by_id(&state.pool, current.id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "Assignment was changed by another request, reload and try again".into(),
            ))),
            None => Err(assignment_not_found(current.id)),
        };
    };
    tracing::info!(assignment_id = saved.id, status = %saved.status, "Assignment updated");
    Ok(saved)
}

pub async fn update_by_id(
    state: &AppState,
    actor: &AuthUser,
    assignment_id: DbId,
    patch: &UpdateAssignment,
) -> AppResult<Assignment> {
    let current = AssignmentRepo::find_by_id(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| assignment_not_found(assignment_id))?;
    ensure_can_manage(&state.pool, actor, current.intern_id).await?;
    save(state, &current, patch).await
}

/// Update the oldest assignment of `intern_id` to `project_id`.
pub async fn update_by_project(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    project_id: DbId,
    patch: &UpdateAssignment,
) -> AppResult<Assignment> {
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, actor, intern_id).await?;
    let current = AssignmentRepo::find_first_for_project(&state.pool, intern_id, project_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFoundByKey {
                entity: "Assignment",
                key: format!("intern {intern_id} on project {project_id}"),
            })
        })?;
    save(state, &current, patch).await
}

/// Remove every assignment of `intern_id` to `project_id`.
///
/// Returns how many were removed; zero is not an error.
pub async fn remove_by_project(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    project_id: DbId,
) -> AppResult<u64> {
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, actor, intern_id).await?;
    let removed = AssignmentRepo::delete_for_project(&state.pool, intern_id, project_id).await?;
    tracing::info!(intern_id, project_id, removed, "Assignments removed");
    Ok(removed)
}

pub async fn delete_by_id(state: &AppState, actor: &AuthUser, assignment_id: DbId) -> AppResult<()> {
    let current = AssignmentRepo::find_by_id(&state.pool, assignment_id)
        .await?
        .ok_or_else(|| assignment_not_found(assignment_id))?;
    ensure_can_manage(&state.pool, actor, current.intern_id).await?;
    if !AssignmentRepo::delete(&state.pool, assignment_id).await? {
        return Err(assignment_not_found(assignment_id));
    }
    Ok(())
}
