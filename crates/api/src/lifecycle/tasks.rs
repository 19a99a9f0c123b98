//! Weekly task board.
//!
//! `week_number` is the intern's task sequence number: the n-th task created
//! for them, not a calendar week.

use serde::Deserialize;

use cohort_core::error::CoreError;
use cohort_core::task::{next_week_number, validate_transition, TaskStatus};
use cohort_core::types::DbId;
use cohort_db::models::task::{CreateTask, Task, UpdateTask};
use cohort_db::repositories::{NotificationRepo, TaskRepo};

use super::{ensure_can_manage, load_intern, required_text};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of `PATCH /interns/me/tasks/{task_id}`.
///
/// Interns cannot write feedback. Sending a proof without a status marks the
/// task completed.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InternTaskUpdate {
    pub status: Option<TaskStatus>,
    pub proof_url: Option<String>,
}

impl From<&InternTaskUpdate> for UpdateTask {
    fn from(update: &InternTaskUpdate) -> Self {
        let status = match (update.status, &update.proof_url) {
            (None, Some(_)) => Some(TaskStatus::Completed),
            (status, _) => status,
        };
        UpdateTask {
            status,
            feedback: None,
            proof_url: update.proof_url.clone(),
        }
    }
}

fn task_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Task", id })
}

/// Merge a patch into a task. A completed task cannot return to `pending`.
pub fn apply_patch(current: &Task, patch: &UpdateTask) -> AppResult<Task> {
    if patch.status.is_none() && patch.feedback.is_none() && patch.proof_url.is_none() {
        return Err(AppError::Core(CoreError::Validation(
            "At least one of status, feedback or proof_url is required".into(),
        )));
    }

    let mut next = current.clone();
    if let Some(status) = patch.status {
        validate_transition(current.status()?, status)?;
        next.status = status.as_str().to_string();
    }
    if let Some(feedback) = &patch.feedback {
        next.feedback = feedback.clone();
    }
    if let Some(proof) = &patch.proof_url {
        next.proof_url = Some(proof.clone());
    }
    Ok(next)
}

pub async fn create(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    input: &CreateTask,
) -> AppResult<Task> {
    required_text(&input.title, "title")?;
    load_intern(&state.pool, intern_id).await?;
    ensure_can_manage(&state.pool, actor, intern_id).await?;

    let prior = TaskRepo::count_for_intern(&state.pool, intern_id).await?;
    let task = TaskRepo::create(&state.pool, intern_id, next_week_number(prior), input).await?;

    NotificationRepo::create(
        &state.pool,
        intern_id,
        "New weekly task",
        &format!("Week {}: {}", task.week_number, task.title),
    )
    .await?;

    tracing::info!(task_id = task.id, intern_id, week = task.week_number, "Task created");
    Ok(task)
}

async fn save(state: &AppState, intern_id: DbId, task_id: DbId, patch: &UpdateTask) -> AppResult<Task> {
    let current = TaskRepo::find_for_intern(&state.pool, intern_id, task_id)
        .await?
        .ok_or_else(|| task_not_found(task_id))?;
    let next = apply_patch(&current, patch)?;
    let Some(saved) = TaskRepo::update(&state.pool, &next, &current.status).await? else {
        return match TaskRepo::find_for_intern(&state.pool, intern_id, task_id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "Task was changed by another request, reload and try again".into(),
            ))),
            None => Err(task_not_found(task_id)),
        };
    };
    tracing::info!(task_id, intern_id, status = %saved.status, "Task updated");
    Ok(saved)
}

/// Update by an admin or the intern's manager.
pub async fn update_by_staff(
    state: &AppState,
    actor: &AuthUser,
    intern_id: DbId,
    task_id: DbId,
    patch: &UpdateTask,
) -> AppResult<Task> {
    ensure_can_manage(&state.pool, actor, intern_id).await?;
    save(state, intern_id, task_id, patch).await
}

/// Update by the intern who owns the task.
pub async fn update_by_intern(
    state: &AppState,
    intern_id: DbId,
    task_id: DbId,
    update: &InternTaskUpdate,
) -> AppResult<Task> {
    save(state, intern_id, task_id, &UpdateTask::from(update)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;

    fn task(status: &str) -> Task {
        Task {
            id: 3,
            intern_id: 9,
            week_number: 2,
            title: "Schema review".into(),
            description: String::new(),
            deadline: Utc::now(),
            status: status.into(),
            feedback: String::new(),
            proof_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn proof_without_status_completes() {
        let update = InternTaskUpdate {
            status: None,
            proof_url: Some("https://files.example/proof.pdf".into()),
        };
        let patch = UpdateTask::from(&update);
        let next = apply_patch(&task("pending"), &patch).unwrap();
        assert_eq!(next.status, "completed");
        assert_eq!(next.proof_url.as_deref(), Some("https://files.example/proof.pdf"));
    }

    #[test]
    fn intern_updates_never_carry_feedback() {
        let update = InternTaskUpdate {
            status: Some(TaskStatus::Completed),
            proof_url: None,
        };
        assert!(UpdateTask::from(&update).feedback.is_none());
    }

    #[test]
    fn completed_task_cannot_reopen() {
        let patch = UpdateTask {
            status: Some(TaskStatus::Pending),
            ..Default::default()
        };
        assert_matches!(
            apply_patch(&task("completed"), &patch),
            Err(AppError::Core(CoreError::Conflict(_)))
        );
    }

    #[test]
    fn feedback_on_completed_task_is_allowed() {
        let patch = UpdateTask {
            feedback: Some("Well done".into()),
            ..Default::default()
        };
        let next = apply_patch(&task("completed"), &patch).unwrap();
        assert_eq!(next.feedback, "Well done");
        assert_eq!(next.status, "completed");
    }

    #[test]
    fn empty_patch_is_rejected() {
        assert_matches!(
            apply_patch(&task("pending"), &UpdateTask::default()),
            Err(AppError::Core(CoreError::Validation(_)))
        );
    }
}
