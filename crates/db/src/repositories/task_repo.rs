//! Repository for the `tasks` board.

use cohort_core::task::TaskStatus;
use cohort_core::types::DbId;
use sqlx::PgPool;

use crate::models::task::{CreateTask, Task};

const COLUMNS: &str = "id, intern_id, week_number, title, description, deadline, status, \
                       feedback, proof_url, created_at, updated_at";

/// Per-intern weekly tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a task with the given per-intern week number.
    ///
    /// Two concurrent inserts for one intern with the same number collide on
    /// `uq_tasks_intern_week` rather than sharing it.
    pub async fn create(
        pool: &PgPool,
        intern_id: DbId,
        week_number: i32,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (intern_id, week_number, title, description, deadline, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(intern_id)
            .bind(week_number)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.deadline)
            .bind(TaskStatus::Pending.as_str())
            .fetch_one(pool)
            .await
    }

    /// Find a task belonging to `intern_id`.
    pub async fn find_for_intern(
        pool: &PgPool,
        intern_id: DbId,
        task_id: DbId,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND intern_id = $2");
        sqlx::query_as::<_, Task>(&query)
            .bind(task_id)
            .bind(intern_id)
            .fetch_optional(pool)
            .await
    }

    /// An intern's tasks in week order.
    pub async fn list_for_intern(pool: &PgPool, intern_id: DbId) -> Result<Vec<Task>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM tasks WHERE intern_id = $1 ORDER BY week_number");
        sqlx::query_as::<_, Task>(&query)
            .bind(intern_id)
            .fetch_all(pool)
            .await
    }

    /// Number of tasks an intern holds.
    pub async fn count_for_intern(pool: &PgPool, intern_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE intern_id = $1")
            .bind(intern_id)
            .fetch_one(pool)
            .await
    }

    /// Overwrite the mutable fields of a task after the caller merged a patch.
    ///
    /// Returns `None` if the task is gone or its status is no longer
    /// `expected_status`.
    pub async fn update(
        pool: &PgPool,
        task: &Task,
        expected_status: &str,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                status = $2,
                feedback = $3,
                proof_url = $4
             WHERE id = $1 AND status = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(task.id)
            .bind(&task.status)
            .bind(&task.feedback)
            .bind(&task.proof_url)
            .bind(expected_status)
            .fetch_optional(pool)
            .await
    }
}
