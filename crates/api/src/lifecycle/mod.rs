//! Internship lifecycle operations.
//!
//! Handlers stay thin: they authenticate, parse the request and call into
//! these functions, which own validation, access checks, transactions and
//! the hand-off to the email outbox.

pub mod accounts;
pub mod activation;
pub mod assignments;
pub mod attendance;
pub mod completion;
pub mod registration;
pub mod tasks;

use serde::Serialize;
use sqlx::PgPool;

use cohort_core::error::CoreError;
use cohort_core::letters::DEFAULT_CONTACT_NAME;
use cohort_core::types::DbId;
use cohort_db::models::intern::Intern;
use cohort_db::models::outbox::OutboxEntry;
use cohort_db::repositories::{AssignmentRepo, CollegeRepo, InternRepo, OutboxRepo};
use cohort_events::{DeliveryOutcome, DispatchError, OutboxDispatcher};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// An intern as returned by the API, with its email delivery state.
#[derive(Debug, Serialize)]
pub struct InternResponse {
    #[serde(flatten)]
    pub intern: Intern,
    /// `true` while any email for this intern is still undelivered.
    pub notification_pending: bool,
}

/// Load an intern or fail with 404.
pub async fn load_intern(pool: &PgPool, id: DbId) -> AppResult<Intern> {
    InternRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Intern",
            id,
        }))
}

pub async fn intern_response(pool: &PgPool, intern: Intern) -> AppResult<InternResponse> {
    let notification_pending = OutboxRepo::has_undelivered(pool, intern.id).await?;
    Ok(InternResponse {
        intern,
        notification_pending,
    })
}

/// Admins may act on every intern; managers only on interns assigned to a
/// project they own.
pub async fn ensure_can_manage(pool: &PgPool, actor: &AuthUser, intern_id: DbId) -> AppResult<()> {
    if actor.is_admin() || AssignmentRepo::intern_managed_by(pool, intern_id, actor.user_id).await? {
        return Ok(());
    }
    Err(AppError::Core(CoreError::Forbidden(
        "Intern is not assigned to any of your projects".into(),
    )))
}

/// Addressee for letters to a college, falling back to [`DEFAULT_CONTACT_NAME`].
pub async fn college_contact(pool: &PgPool, college: &str) -> AppResult<String> {
    Ok(CollegeRepo::find_by_name(pool, college)
        .await?
        .map(|c| c.contact_name)
        .unwrap_or_else(|| DEFAULT_CONTACT_NAME.to_string()))
}

/// Deliver a freshly queued email.
///
/// A failed send leaves the entry in the outbox for retry and is reported as
/// [`AppError::NotificationPending`]. Entries deferred for lack of a mail
/// transport stay `pending` and surface through `notification_pending`.
pub async fn deliver_now(
    outbox: &OutboxDispatcher,
    entry: &OutboxEntry,
) -> AppResult<DeliveryOutcome> {
    match outbox.deliver(entry).await {
        Ok(outcome) => Ok(outcome),
        Err(DispatchError::Delivery { entry_id, source }) => Err(AppError::NotificationPending {
            entry_id,
            message: source.to_string(),
        }),
        Err(DispatchError::Database(e)) => Err(e.into()),
    }
}

/// Return the value of a required request field.
pub(crate) fn required<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::Core(CoreError::Validation(format!("{field} is required"))))
}

/// Reject a blank required text field.
pub(crate) fn required_text<'a>(value: &'a str, field: &str) -> AppResult<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} is required"
        ))));
    }
    Ok(trimmed)
}
