//! Repository for intern profiles (`users` joined with `intern_profiles`).

use chrono::NaiveDate;
use cohort_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::intern::{CreateInternProfile, Intern};

/// Joined column list; `u` is `users`, `p` is `intern_profiles`.
const COLUMNS: &str = "u.id, u.full_name, u.email, u.is_active, u.is_email_verified, \
                       p.phone, p.college, p.course, p.department, p.semester, p.ref_no, \
                       p.interview_at, p.recommendation_ref, p.college_id_ref, \
                       p.internship_start, p.internship_end, p.activated_at, p.completed_at, \
                       u.created_at";

const FROM: &str = "users u JOIN intern_profiles p ON p.user_id = u.id";

/// Provides read and lifecycle updates for interns.
pub struct InternRepo;

impl InternRepo {
    /// Insert the profile row for a freshly created intern user.
    pub async fn create_profile(
        executor: impl PgExecutor<'_>,
        user_id: DbId,
        input: &CreateInternProfile,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO intern_profiles
                (user_id, phone, college, course, department, semester, ref_no,
                 interview_at, recommendation_ref, college_id_ref)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(user_id)
        .bind(&input.phone)
        .bind(&input.college)
        .bind(&input.course)
        .bind(&input.department)
        .bind(&input.semester)
        .bind(&input.ref_no)
        .bind(input.interview_at)
        .bind(&input.recommendation_ref)
        .bind(&input.college_id_ref)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Find an intern by user ID.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<Intern>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE u.id = $1");
        sqlx::query_as::<_, Intern>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    /// List interns, optionally filtered by the active flag, newest first.
    pub async fn list(
        pool: &PgPool,
        active: Option<bool>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Intern>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE ($1::BOOLEAN IS NULL OR u.is_active = $1)
             ORDER BY u.created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Intern>(&query)
            .bind(active)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Interns holding at least one assignment on a project owned by `manager_id`.
    pub async fn list_for_manager(
        pool: &PgPool,
        manager_id: DbId,
    ) -> Result<Vec<Intern>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM}
             WHERE EXISTS (
                SELECT 1 FROM assignments a
                JOIN projects pr ON pr.id = a.project_id
                WHERE a.intern_id = u.id AND pr.manager_id = $1
             )
             ORDER BY u.full_name"
        );
        sqlx::query_as::<_, Intern>(&query)
            .bind(manager_id)
            .fetch_all(pool)
            .await
    }

    /// Record the internship window chosen at activation.
    pub async fn set_internship_window(
        executor: impl PgExecutor<'_>,
        id: DbId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE intern_profiles SET
                internship_start = $2,
                internship_end = $3,
                activated_at = NOW()
             WHERE user_id = $1",
        )
        .bind(id)
        .bind(start)
        .bind(end)
        .execute(executor)
        .await?;
        Ok(())
    }

    /// Stamp `completed_at`.
    pub async fn mark_completed(executor: impl PgExecutor<'_>, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE intern_profiles SET completed_at = NOW() WHERE user_id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(())
    }
}
