//! Email outbox model.

use cohort_core::notify::{EmailAttachment, OutgoingEmail};
use cohort_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

pub const OUTBOX_PENDING: &str = "pending";
/// Claimed by a dispatcher and currently being handed to the notifier.
pub const OUTBOX_SENDING: &str = "sending";
pub const OUTBOX_SENT: &str = "sent";
pub const OUTBOX_FAILED: &str = "failed";

/// Stored in place of the body of a delivered email that carried a password.
pub const REDACTED_BODY: &str = "[redacted after delivery]";

/// Outbox entry kinds.
pub mod kinds {
    pub const INTERVIEW_CONFIRMATION: &str = "interview_confirmation";
    pub const ACTIVATION: &str = "activation";
    pub const CREDENTIALS: &str = "credentials";
    pub const COMPLETION: &str = "completion";

    /// Kinds whose body contains a temporary password.
    pub const WITH_CREDENTIALS: &[&str] = &[ACTIVATION, CREDENTIALS];
}

/// A full row from the `email_outbox` table.
#[derive(Debug, Clone, FromRow)]
pub struct OutboxEntry {
    pub id: DbId,
    pub intern_id: Option<DbId>,
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment_name: Option<String>,
    pub attachment_content_type: Option<String>,
    pub attachment: Option<Vec<u8>>,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
}

impl OutboxEntry {
    /// Rebuild the email this entry was created from.
    pub fn to_email(&self) -> OutgoingEmail {
        let attachment = match (&self.attachment_name, &self.attachment) {
            (Some(filename), Some(bytes)) => Some(EmailAttachment {
                filename: filename.clone(),
                content_type: self
                    .attachment_content_type
                    .clone()
                    .unwrap_or_else(|| "application/octet-stream".to_string()),
                bytes: bytes.clone(),
            }),
            _ => None,
        };
        OutgoingEmail {
            to: self.recipient.clone(),
            subject: self.subject.clone(),
            body: self.body.clone(),
            attachment,
        }
    }
}

/// Outbox entry without the body and attachment, for admin listings.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OutboxSummary {
    pub id: DbId,
    pub intern_id: Option<DbId>,
    pub kind: String,
    pub recipient: String,
    pub subject: String,
    pub status: String,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: Timestamp,
    pub sent_at: Option<Timestamp>,
}
