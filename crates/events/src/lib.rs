//! Notification delivery for the internship portal.
//!
//! - [`delivery`]: [`Notifier`](cohort_core::notify::Notifier) implementations
//!   (SMTP via `lettre`, and a log-only fallback for unconfigured deployments)
//! - [`outbox`]: drains the `email_outbox` table through a notifier, recording
//!   every attempt so failed emails can be retried

pub mod delivery;
pub mod outbox;

pub use delivery::email::{EmailConfig, SmtpNotifier};
pub use delivery::log::LogNotifier;
pub use outbox::{DeliveryOutcome, DispatchError, DispatchStats, OutboxDispatcher};
