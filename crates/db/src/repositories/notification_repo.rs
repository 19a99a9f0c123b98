//! Repository for `intern_notifications`.

use cohort_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::notification::InternNotification;

const COLUMNS: &str = "id, intern_id, title, message, is_read, created_at";

/// In-app notifications shown on the intern dashboard.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Append a notification for an intern.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        intern_id: DbId,
        title: &str,
        message: &str,
    ) -> Result<InternNotification, sqlx::Error> {
        let query = format!(
            "INSERT INTO intern_notifications (intern_id, title, message)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, InternNotification>(&query)
            .bind(intern_id)
            .bind(title)
            .bind(message)
            .fetch_one(executor)
            .await
    }

    /// An intern's notifications, newest first.
    pub async fn list_for_intern(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<Vec<InternNotification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM intern_notifications
             WHERE intern_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, InternNotification>(&query)
            .bind(intern_id)
            .fetch_all(pool)
            .await
    }

    /// Mark one of the intern's notifications read.
    ///
    /// Returns `false` if the notification does not belong to the intern.
    pub async fn mark_read(pool: &PgPool, intern_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE intern_notifications SET is_read = true WHERE id = $1 AND intern_id = $2",
        )
        .bind(id)
        .bind(intern_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
