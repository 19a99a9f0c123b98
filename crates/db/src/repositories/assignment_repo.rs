//! Repository for the `assignments` table.
//!
//! This table is the single record of intern/project membership. Both the
//! intern-side and the project-side views are queries over it.

use cohort_core::assignment::AssignmentStatus;
use cohort_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::assignment::{
    Assignment, AssignmentWithProject, CreateAssignment, ProjectIntern,
};

const COLUMNS: &str = "id, intern_id, project_id, start_date, end_date, status, feedback, \
                       assigned_at, updated_at";

/// Provides CRUD operations for assignments.
pub struct AssignmentRepo;

impl AssignmentRepo {
    /// Insert a new assignment with status `assigned`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateAssignment,
    ) -> Result<Assignment, sqlx::Error> {
        let query = format!(
            "INSERT INTO assignments (intern_id, project_id, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(input.intern_id)
            .bind(input.project_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(AssignmentStatus::Assigned.as_str())
            .fetch_one(executor)
            .await
    }

    /// Find an assignment by ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assignments WHERE id = $1");
        sqlx::query_as::<_, Assignment>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// The oldest assignment of `intern_id` to `project_id`, if any.
    pub async fn find_first_for_project(
        pool: &PgPool,
        intern_id: DbId,
        project_id: DbId,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM assignments
             WHERE intern_id = $1 AND project_id = $2
             ORDER BY assigned_at, id
             LIMIT 1"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(intern_id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// An intern's assignments with project titles, in assignment order.
    pub async fn list_for_intern(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<Vec<AssignmentWithProject>, sqlx::Error> {
        sqlx::query_as::<_, AssignmentWithProject>(
            "SELECT a.id, a.intern_id, a.project_id, p.title AS project_title, p.manager_id,
                    a.start_date, a.end_date, a.status, a.feedback, a.assigned_at
             FROM assignments a
             JOIN projects p ON p.id = a.project_id
             WHERE a.intern_id = $1
             ORDER BY a.assigned_at, a.id",
        )
        .bind(intern_id)
        .fetch_all(pool)
        .await
    }

    /// The interns assigned to a project.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectIntern>, sqlx::Error> {
        sqlx::query_as::<_, ProjectIntern>(
            "SELECT a.id AS assignment_id, a.intern_id, u.full_name, u.email,
                    a.start_date, a.end_date, a.status, a.feedback
             FROM assignments a
             JOIN users u ON u.id = a.intern_id
             WHERE a.project_id = $1
             ORDER BY a.assigned_at, a.id",
        )
        .bind(project_id)
        .fetch_all(pool)
        .await
    }

    /// Overwrite the editable fields of an assignment.
    ///
    /// Callers merge the patch and validate it against the row they read
    /// first. The write only applies while the stored status still equals
    /// `expected_status`; otherwise `None` is returned.
    pub async fn update(
        executor: impl PgExecutor<'_>,
        assignment: &Assignment,
        expected_status: &str,
    ) -> Result<Option<Assignment>, sqlx::Error> {
        let query = format!(
            "UPDATE assignments SET
                start_date = $2,
                end_date = $3,
                status = $4,
                feedback = $5
             WHERE id = $1 AND status = $6
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Assignment>(&query)
            .bind(assignment.id)
            .bind(assignment.start_date)
            .bind(assignment.end_date)
            .bind(&assignment.status)
            .bind(&assignment.feedback)
            .bind(expected_status)
            .fetch_optional(executor)
            .await
    }

    /// Mark every open assignment of an intern `completed`.
    ///
    /// Returns the number of rows changed.
    pub async fn complete_open_for_intern(
        executor: impl PgExecutor<'_>,
        intern_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE assignments SET status = $2
             WHERE intern_id = $1 AND status <> $2",
        )
        .bind(intern_id)
        .bind(AssignmentStatus::Completed.as_str())
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete one assignment by ID.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every assignment of `intern_id` to `project_id`.
    ///
    /// Returns the number of rows removed; zero is not an error.
    pub async fn delete_for_project(
        pool: &PgPool,
        intern_id: DbId,
        project_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM assignments WHERE intern_id = $1 AND project_id = $2")
                .bind(intern_id)
                .bind(project_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    /// Whether `intern_id` is assigned to any project owned by `manager_id`.
    pub async fn intern_managed_by(
        pool: &PgPool,
        intern_id: DbId,
        manager_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM assignments a
                JOIN projects p ON p.id = a.project_id
                WHERE a.intern_id = $1 AND p.manager_id = $2
             )",
        )
        .bind(intern_id)
        .bind(manager_id)
        .fetch_one(pool)
        .await
    }

    /// The project of the intern's most recent open assignment, if any.
    pub async fn current_project(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT project_id FROM assignments
             WHERE intern_id = $1 AND status <> $2
             ORDER BY assigned_at DESC, id DESC
             LIMIT 1",
        )
        .bind(intern_id)
        .bind(AssignmentStatus::Completed.as_str())
        .fetch_optional(pool)
        .await
    }
}
