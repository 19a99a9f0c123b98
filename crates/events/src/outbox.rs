//! Email outbox dispatcher.
//!
//! Emails are written to `email_outbox` in the same transaction as the state
//! change that triggers them. [`OutboxDispatcher`] claims each undelivered
//! entry, hands it to a [`Notifier`] and records the outcome on the row, so a
//! failed delivery stays visible and retryable instead of being dropped.
//!
//! A claim moves the row to `sending`. Only one caller can win it, so the
//! request path and the background loop never send the same email twice.
//! Claims older than [`CLAIM_TIMEOUT`] are treated as abandoned.

use std::sync::Arc;
use std::time::Duration;

use cohort_core::notify::{Notifier, NotifyError};
use cohort_core::types::DbId;
use cohort_db::models::outbox::OutboxEntry;
use cohort_db::repositories::OutboxRepo;
use serde::Serialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default poll interval of the background loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default number of delivery attempts before an entry is left alone.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

/// Entries fetched per poll.
const BATCH_SIZE: i64 = 50;

/// Age after which a `sending` claim is considered abandoned.
pub const CLAIM_TIMEOUT: Duration = Duration::from_secs(600);

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("Outbox entry {entry_id} was not delivered: {source}")]
    Delivery {
        entry_id: DbId,
        #[source]
        source: NotifyError,
    },

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// What [`OutboxDispatcher::deliver`] did with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Sent,
    /// Already sent, or claimed by another dispatcher.
    Skipped,
    /// The notifier does not deliver mail; the entry stays undelivered.
    Deferred,
}

/// Outcome counts of one dispatch pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub sent: usize,
    pub failed: usize,
}

/// Delivers outbox entries through a [`Notifier`].
#[derive(Clone)]
pub struct OutboxDispatcher {
    pool: PgPool,
    notifier: Arc<dyn Notifier>,
    max_attempts: i32,
}

impl OutboxDispatcher {
    pub fn new(pool: PgPool, notifier: Arc<dyn Notifier>, max_attempts: i32) -> Self {
        Self {
            pool,
            notifier,
            max_attempts,
        }
    }

    fn claim_timeout_secs() -> i64 {
        CLAIM_TIMEOUT.as_secs() as i64
    }

    /// Claim one entry and attempt its delivery.
    ///
    /// Attempts are not capped here, so admins can retry exhausted entries.
    /// A failed send marks the entry `failed`, bumps `attempts` and returns
    /// [`DispatchError::Delivery`].
    pub async fn deliver(&self, entry: &OutboxEntry) -> Result<DeliveryOutcome, DispatchError> {
        if !self.notifier.delivers() {
            tracing::warn!(
                entry_id = entry.id,
                kind = %entry.kind,
                to = %entry.recipient,
                "No mail transport configured, outbox entry left undelivered"
            );
            return Ok(DeliveryOutcome::Deferred);
        }

        let Some(claimed) =
            OutboxRepo::claim(&self.pool, entry.id, Self::claim_timeout_secs()).await?
        else {
            tracing::debug!(entry_id = entry.id, "Outbox entry already sent or claimed");
            return Ok(DeliveryOutcome::Skipped);
        };
        self.send_claimed(&claimed).await?;
        Ok(DeliveryOutcome::Sent)
    }

    async fn send_claimed(&self, entry: &OutboxEntry) -> Result<(), DispatchError> {
        match self.notifier.send(&entry.to_email()).await {
            Ok(()) => {
                OutboxRepo::mark_sent(&self.pool, entry.id).await?;
                tracing::info!(entry_id = entry.id, kind = %entry.kind, "Outbox entry delivered");
                Ok(())
            }
            Err(source) => {
                let message = source.to_string();
                OutboxRepo::mark_failed(&self.pool, entry.id, &message).await?;
                tracing::warn!(
                    entry_id = entry.id,
                    kind = %entry.kind,
                    attempts = entry.attempts + 1,
                    error = %message,
                    "Outbox entry delivery failed"
                );
                Err(DispatchError::Delivery {
                    entry_id: entry.id,
                    source,
                })
            }
        }
    }

    /// Claim and deliver every due entry once.
    pub async fn dispatch_due(&self) -> Result<DispatchStats, sqlx::Error> {
        let mut stats = DispatchStats::default();
        if !self.notifier.delivers() {
            return Ok(stats);
        }

        let due = OutboxRepo::claim_due(
            &self.pool,
            self.max_attempts,
            BATCH_SIZE,
            Self::claim_timeout_secs(),
        )
        .await?;
        for entry in &due {
            match self.send_claimed(entry).await {
                Ok(()) => stats.sent += 1,
                Err(DispatchError::Delivery { .. }) => stats.failed += 1,
                Err(DispatchError::Database(e)) => return Err(e),
            }
        }
        Ok(stats)
    }

    /// Run the dispatch loop until `cancel` is triggered.
    pub async fn run(self, poll_interval: Duration, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = poll_interval.as_secs(),
            max_attempts = self.max_attempts,
            "Outbox dispatcher started"
        );
        if !self.notifier.delivers() {
            tracing::warn!("No mail transport configured, outbox entries stay pending");
        }

        let mut interval = tokio::time::interval(poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Outbox dispatcher stopping");
                    break;
                }
                _ = interval.tick() => {
                    match self.dispatch_due().await {
                        Ok(stats) if stats.sent + stats.failed > 0 => {
                            tracing::info!(sent = stats.sent, failed = stats.failed, "Outbox: dispatch pass complete");
                        }
                        Ok(_) => tracing::debug!("Outbox: nothing due"),
                        Err(e) => tracing::error!(error = %e, "Outbox: dispatch pass failed"),
                    }
                }
            }
        }
    }
}
