//! Log-only notifier used when SMTP is not configured.

use async_trait::async_trait;
use cohort_core::notify::{Notifier, NotifyError, OutgoingEmail};

/// Records each email in the log instead of sending it.
///
/// Only the recipient, subject and attachment name are logged; bodies may
/// carry temporary credentials. [`Notifier::delivers`] is `false`, so the
/// outbox keeps entries `pending` until a real transport is configured.
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), NotifyError> {
        tracing::warn!(
            to = %email.to,
            subject = %email.subject,
            attachment = email.attachment.as_ref().map(|a| a.filename.as_str()),
            "SMTP not configured, email not sent"
        );
        Ok(())
    }

    fn delivers(&self) -> bool {
        false
    }
}
