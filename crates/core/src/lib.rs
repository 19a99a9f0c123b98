//! Cohort domain core.
//!
//! Pure business rules for the internship lifecycle. This crate has zero
//! internal dependencies so the repository, delivery and HTTP layers can all
//! share one definition of every status, transition and validation rule.

#[macro_use]
mod status;

pub mod assignment;
pub mod attendance;
pub mod calendar;
pub mod credentials;
pub mod error;
pub mod interview;
pub mod letters;
pub mod notify;
pub mod registration;
pub mod roles;
pub mod task;
pub mod types;
