//! Attendance ledger: daily marks, manager resolution and summaries.

use serde::Serialize;
use sqlx::PgPool;

use cohort_core::attendance::{self as rules, AttendanceStatus, AttendanceSummary};
use cohort_core::calendar::ist_today;
use cohort_core::error::CoreError;
use cohort_core::letters::{AttendanceReport, AttendanceReportRow};
use cohort_core::types::DbId;
use cohort_db::models::attendance::{AttendanceCounts, AttendanceEntry};
use cohort_db::repositories::{AssignmentRepo, AttendanceRepo, NotificationRepo};

use super::ensure_can_manage;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// An intern's attendance entries with their summary.
#[derive(Debug, Serialize)]
pub struct AttendanceHistory {
    pub entries: Vec<AttendanceEntry>,
    pub summary: AttendanceSummary,
    pub present_percentage: f64,
}

/// One intern's line in the all-interns summary.
#[derive(Debug, Serialize)]
pub struct InternAttendanceSummary {
    pub intern_id: DbId,
    pub full_name: String,
    pub email: String,
    #[serde(flatten)]
    pub summary: AttendanceSummary,
    pub total: i64,
    pub present_percentage: f64,
}

fn summary_of(counts: &AttendanceCounts) -> AttendanceSummary {
    let mut summary = AttendanceSummary::default();
    summary.record(AttendanceStatus::Present, counts.present);
    summary.record(AttendanceStatus::Absent, counts.absent);
    summary.record(AttendanceStatus::Pending, counts.pending);
    summary
}

/// Record today's attendance (an IST calendar day) as `pending`.
///
/// The entry is tagged with the intern's current open assignment, if any.
pub async fn mark_today(pool: &PgPool, intern_id: DbId) -> AppResult<AttendanceEntry> {
    let day = ist_today();
    let project_id = AssignmentRepo::current_project(pool, intern_id).await?;
    let entry = AttendanceRepo::mark_day(pool, intern_id, day, project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Conflict("Today already marked".into())))?;
    tracing::info!(intern_id, %day, entry_id = entry.id, "Attendance marked");
    Ok(entry)
}

/// Resolve an entry to `present` or `absent`.
///
/// A resolved entry may be flipped; the latest decision wins and refreshes
/// the approval time and approver.
pub async fn confirm(
    state: &AppState,
    actor: &AuthUser,
    entry_id: DbId,
    confirmed: bool,
) -> AppResult<AttendanceEntry> {
    let not_found = || {
        AppError::Core(CoreError::NotFound {
            entity: "AttendanceEntry",
            id: entry_id,
        })
    };
    let entry = AttendanceRepo::find_by_id(&state.pool, entry_id)
        .await?
        .ok_or_else(not_found)?;
    ensure_can_manage(&state.pool, actor, entry.intern_id).await?;

    let next = rules::resolve(entry.status()?, confirmed)?;
    let updated = AttendanceRepo::resolve(&state.pool, entry.id, next, actor.user_id)
        .await?
        .ok_or_else(not_found)?;

    NotificationRepo::create(
        &state.pool,
        entry.intern_id,
        "Attendance reviewed",
        &format!(
            "Your attendance for {} was marked {next}.",
            entry.attendance_date
        ),
    )
    .await?;

    tracing::info!(entry_id, status = %next, approved_by = actor.user_id, "Attendance resolved");
    Ok(updated)
}

pub async fn history(pool: &PgPool, intern_id: DbId) -> AppResult<AttendanceHistory> {
    let entries = AttendanceRepo::list_for_intern(pool, intern_id).await?;
    let summary = AttendanceRepo::summary_for_intern(pool, intern_id).await?;
    Ok(AttendanceHistory {
        entries,
        present_percentage: summary.present_percentage(),
        summary,
    })
}

/// Status counts for every intern.
pub async fn all_summaries(pool: &PgPool) -> AppResult<Vec<InternAttendanceSummary>> {
    let rows = AttendanceRepo::counts_for_all(pool).await?;
    Ok(rows
        .into_iter()
        .map(|row| {
            let summary = summary_of(&row);
            InternAttendanceSummary {
                intern_id: row.intern_id,
                full_name: row.full_name,
                email: row.email,
                total: summary.total(),
                present_percentage: summary.present_percentage(),
                summary,
            }
        })
        .collect())
}

/// Render the all-interns summary as a PDF.
pub async fn report_pdf(state: &AppState) -> AppResult<Vec<u8>> {
    let rows = AttendanceRepo::counts_for_all(&state.pool).await?;
    let report = AttendanceReport {
        generated_at: chrono::Utc::now(),
        rows: rows
            .iter()
            .map(|row| AttendanceReportRow {
                intern_name: row.full_name.clone(),
                email: row.email.clone(),
                summary: summary_of(row),
            })
            .collect(),
    };
    Ok(state.renderer.render_attendance_report(&report).await?)
}
