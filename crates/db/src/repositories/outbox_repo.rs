//! Repository for the `email_outbox` table.

use cohort_core::notify::OutgoingEmail;
use cohort_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::outbox::{
    kinds, OutboxEntry, OutboxSummary, OUTBOX_FAILED, OUTBOX_PENDING, OUTBOX_SENDING, OUTBOX_SENT,
    REDACTED_BODY,
};

const COLUMNS: &str = "id, intern_id, kind, recipient, subject, body, attachment_name, \
                       attachment_content_type, attachment, status, attempts, last_error, \
                       created_at, claimed_at, sent_at";

/// Matches rows a dispatcher may claim: undelivered, or stuck in `sending`
/// for longer than `$3` seconds. Expects `$1` = pending, `$2` = failed and
/// `$4` = sending.
const CLAIMABLE: &str = "(status IN ($1, $2)
                          OR (status = $4 AND claimed_at < NOW() - $3 * INTERVAL '1 second'))";

const SUMMARY_COLUMNS: &str = "id, intern_id, kind, recipient, subject, status, attempts, \
                               last_error, created_at, sent_at";

/// Durable queue of notification emails.
pub struct OutboxRepo;

impl OutboxRepo {
    /// Queue an email as `pending`.
    pub async fn enqueue(
        executor: impl PgExecutor<'_>,
        intern_id: Option<DbId>,
        kind: &str,
        email: &OutgoingEmail,
    ) -> Result<OutboxEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO email_outbox
                (intern_id, kind, recipient, subject, body,
                 attachment_name, attachment_content_type, attachment)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        let attachment = email.attachment.as_ref();
        sqlx::query_as::<_, OutboxEntry>(&query)
            .bind(intern_id)
            .bind(kind)
            .bind(&email.to)
            .bind(&email.subject)
            .bind(&email.body)
            .bind(attachment.map(|a| a.filename.as_str()))
            .bind(attachment.map(|a| a.content_type.as_str()))
            .bind(attachment.map(|a| a.bytes.as_slice()))
            .fetch_one(executor)
            .await
    }

    /// Find an entry by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<OutboxEntry>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM email_outbox WHERE id = $1");
        sqlx::query_as::<_, OutboxEntry>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List entries, optionally filtered by status, newest first.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OutboxSummary>, sqlx::Error> {
        let query = format!(
            "SELECT {SUMMARY_COLUMNS} FROM email_outbox
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, OutboxSummary>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Claim one entry for delivery.
    ///
    /// Returns `None` when the entry is already sent or another dispatcher
    /// holds a fresh claim on it.
    pub async fn claim(
        pool: &PgPool,
        id: DbId,
        stale_after_secs: i64,
    ) -> Result<Option<OutboxEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE email_outbox SET status = $4, claimed_at = NOW()
             WHERE id = $5 AND {CLAIMABLE}
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OutboxEntry>(&query)
            .bind(OUTBOX_PENDING)
            .bind(OUTBOX_FAILED)
            .bind(stale_after_secs as f64)
            .bind(OUTBOX_SENDING)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Claim up to `limit` due entries with attempts left, oldest first.
    ///
    /// Rows locked by a concurrent claim are skipped, so two dispatchers
    /// never receive the same entry.
    pub async fn claim_due(
        pool: &PgPool,
        max_attempts: i32,
        limit: i64,
        stale_after_secs: i64,
    ) -> Result<Vec<OutboxEntry>, sqlx::Error> {
        let query = format!(
            "UPDATE email_outbox SET status = $4, claimed_at = NOW()
             WHERE id IN (
                SELECT id FROM email_outbox
                WHERE {CLAIMABLE} AND attempts < $5
                ORDER BY created_at, id
                LIMIT $6
                FOR UPDATE SKIP LOCKED
             )
             RETURNING {COLUMNS}"
        );
        let mut claimed = sqlx::query_as::<_, OutboxEntry>(&query)
            .bind(OUTBOX_PENDING)
            .bind(OUTBOX_FAILED)
            .bind(stale_after_secs as f64)
            .bind(OUTBOX_SENDING)
            .bind(max_attempts)
            .bind(limit)
            .fetch_all(pool)
            .await?;
        claimed.sort_by_key(|e| (e.created_at, e.id));
        Ok(claimed)
    }

    /// Record a successful delivery.
    ///
    /// Bodies of kinds that carry a temporary password are replaced with
    /// [`REDACTED_BODY`].
    pub async fn mark_sent(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE email_outbox SET
                status = $2,
                attempts = attempts + 1,
                last_error = NULL,
                sent_at = NOW(),
                body = CASE WHEN kind = ANY($3) THEN $4 ELSE body END
             WHERE id = $1",
        )
        .bind(id)
        .bind(OUTBOX_SENT)
        .bind(kinds::WITH_CREDENTIALS)
        .bind(REDACTED_BODY)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Record a failed delivery attempt.
    pub async fn mark_failed(pool: &PgPool, id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE email_outbox SET
                status = $2,
                attempts = attempts + 1,
                last_error = $3
             WHERE id = $1",
        )
        .bind(id)
        .bind(OUTBOX_FAILED)
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Whether any email for the intern is still undelivered.
    pub async fn has_undelivered(pool: &PgPool, intern_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM email_outbox WHERE intern_id = $1 AND status <> $2
             )",
        )
        .bind(intern_id)
        .bind(OUTBOX_SENT)
        .fetch_one(pool)
        .await
    }
}
