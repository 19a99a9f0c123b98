//! Repository for the `attendance` ledger.

use chrono::NaiveDate;
use cohort_core::attendance::{AttendanceStatus, AttendanceSummary};
use cohort_core::types::DbId;
use sqlx::PgPool;

use crate::models::attendance::{AttendanceCounts, AttendanceEntry, PendingAttendance};

const COLUMNS: &str = "id, intern_id, attendance_date, status, project_id, requested_at, \
                       approved_at, approved_by";

/// Daily attendance entries and their resolution.
pub struct AttendanceRepo;

impl AttendanceRepo {
    /// Insert a `pending` entry for `day` unless one already exists.
    ///
    /// Returns `None` when the intern already has an entry for that day. The
    /// check and the insert are one statement against `uq_attendance_intern_day`,
    /// so concurrent calls cannot both succeed.
    pub async fn mark_day(
        pool: &PgPool,
        intern_id: DbId,
        day: NaiveDate,
        project_id: Option<DbId>,
    ) -> Result<Option<AttendanceEntry>, sqlx::Error> {
        let query = format!(
            "INSERT INTO attendance (intern_id, attendance_date, status, project_id)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (intern_id, attendance_date) DO NOTHING
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(intern_id)
            .bind(day)
            .bind(AttendanceStatus::Pending.as_str())
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AttendanceEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM attendance WHERE id = $1");
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// An intern's full history, most recent day first.
    pub async fn list_for_intern(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<Vec<AttendanceEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM attendance
             WHERE intern_id = $1
             ORDER BY attendance_date DESC"
        );
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(intern_id)
            .fetch_all(pool)
            .await
    }

    /// Pending entries awaiting review, oldest first.
    ///
    /// With `manager_id` set, only interns on that manager's projects are listed.
    pub async fn list_pending(
        pool: &PgPool,
        manager_id: Option<DbId>,
    ) -> Result<Vec<PendingAttendance>, sqlx::Error> {
        sqlx::query_as::<_, PendingAttendance>(
            "SELECT at.id, at.intern_id, u.full_name AS intern_name, at.attendance_date,
                    at.project_id, at.requested_at
             FROM attendance at
             JOIN users u ON u.id = at.intern_id
             WHERE at.status = 'pending'
               AND ($1::BIGINT IS NULL OR EXISTS (
                    SELECT 1 FROM assignments a
                    JOIN projects p ON p.id = a.project_id
                    WHERE a.intern_id = at.intern_id AND p.manager_id = $1
               ))
             ORDER BY at.attendance_date, at.id",
        )
        .bind(manager_id)
        .fetch_all(pool)
        .await
    }

    /// Set the resolved status, approval time and approver of an entry.
    pub async fn resolve(
        pool: &PgPool,
        id: DbId,
        status: AttendanceStatus,
        approved_by: DbId,
    ) -> Result<Option<AttendanceEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE attendance SET
                status = $2,
                approved_at = NOW(),
                approved_by = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AttendanceEntry>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(approved_by)
            .fetch_optional(pool)
            .await
    }

    /// Status counts across an intern's full history.
    pub async fn summary_for_intern(
        pool: &PgPool,
        intern_id: DbId,
    ) -> Result<AttendanceSummary, sqlx::Error> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            "SELECT status, COUNT(*) FROM attendance WHERE intern_id = $1 GROUP BY status",
        )
        .bind(intern_id)
        .fetch_all(pool)
        .await?;

        let mut summary = AttendanceSummary::default();
        for (status, count) in rows {
            match status.parse::<AttendanceStatus>() {
                Ok(status) => summary.record(status, count),
                Err(e) => tracing::warn!(intern_id, error = %e, "Skipping unknown attendance status"),
            }
        }
        Ok(summary)
    }

    /// Status counts for every intern, including interns with no entries.
    pub async fn counts_for_all(pool: &PgPool) -> Result<Vec<AttendanceCounts>, sqlx::Error> {
        sqlx::query_as::<_, AttendanceCounts>(
            "SELECT u.id AS intern_id, u.full_name, u.email,
                    COUNT(at.id) FILTER (WHERE at.status = 'present') AS present,
                    COUNT(at.id) FILTER (WHERE at.status = 'absent') AS absent,
                    COUNT(at.id) FILTER (WHERE at.status = 'pending') AS pending
             FROM users u
             LEFT JOIN attendance at ON at.intern_id = u.id
             WHERE u.role = 'intern'
             GROUP BY u.id, u.full_name, u.email
             ORDER BY u.full_name",
        )
        .fetch_all(pool)
        .await
    }
}
