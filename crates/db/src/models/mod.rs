//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts
//! - An update DTO (all `Option` fields) for patches where the entity is editable

pub mod assignment;
pub mod attendance;
pub mod college;
pub mod document;
pub mod intern;
pub mod notification;
pub mod outbox;
pub mod project;
pub mod task;
pub mod user;
