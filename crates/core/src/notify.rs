//! Outgoing email payloads and the [`Notifier`] boundary.
//!
//! The builders in this module produce the exact messages the portal sends;
//! they are stored in the email outbox and later handed to a [`Notifier`].

use async_trait::async_trait;

use crate::calendar::to_ist;
use crate::types::Timestamp;

/// A file attached to an outgoing email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAttachment {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// A plain-text email ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<EmailAttachment>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Email could not be built: {0}")]
    InvalidMessage(String),

    #[error("Email delivery failed: {0}")]
    Delivery(String),
}

/// Delivers emails to interns and managers.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError>;

    /// Whether [`send`](Self::send) actually delivers mail. Dispatchers leave
    /// entries undelivered when this is `false`.
    fn delivers(&self) -> bool {
        true
    }
}

/// Login credentials for a newly created account.
pub fn credential_email(to: &str, name: &str, temp_credential: &str) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Your internship portal account".to_string(),
        body: format!(
            "Hello {name},\n\n\
             An account has been created for you on the internship portal.\n\n\
             Login email: {to}\n\
             Temporary password: {temp_credential}\n\n\
             Please change this password after your first login.\n"
        ),
        attachment: None,
    }
}

/// Activation notice carrying the login credential and the offer letter.
pub fn activation_email(
    to: &str,
    name: &str,
    temp_credential: &str,
    offer_letter: EmailAttachment,
) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Internship confirmed: offer letter and login details".to_string(),
        body: format!(
            "Hello {name},\n\n\
             Your internship has been confirmed. Your offer letter is attached.\n\n\
             Login email: {to}\n\
             Temporary password: {temp_credential}\n\n\
             Log in to mark your daily attendance and follow your weekly tasks.\n"
        ),
        attachment: Some(offer_letter),
    }
}

/// Acknowledges a registration and repeats the chosen interview slot.
pub fn interview_confirmation(to: &str, name: &str, interview_at: Timestamp) -> OutgoingEmail {
    let when = to_ist(interview_at).format("%A, %d %B %Y at %I:%M %p IST");
    OutgoingEmail {
        to: to.to_string(),
        subject: "Internship registration received".to_string(),
        body: format!(
            "Hello {name},\n\n\
             We have received your internship registration.\n\
             Your interview is scheduled for {when}.\n\n\
             You will receive your login details once your registration is verified.\n"
        ),
        attachment: None,
    }
}

/// Congratulates an intern and attaches the completion letter.
pub fn completion_email(to: &str, name: &str, letter: EmailAttachment) -> OutgoingEmail {
    OutgoingEmail {
        to: to.to_string(),
        subject: "Internship completed".to_string(),
        body: format!(
            "Hello {name},\n\n\
             Congratulations on completing your internship. \
             Your completion letter is attached.\n"
        ),
        attachment: Some(letter),
    }
}
