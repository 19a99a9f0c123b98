//! Delivery channels for outgoing email.

pub mod email;
pub mod log;
