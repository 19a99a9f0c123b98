//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Methods that take part in a
//! multi-table unit of work accept any `PgExecutor`, so callers pass either
//! the pool or `&mut *tx` from an open transaction.

pub mod assignment_repo;
pub mod attendance_repo;
pub mod college_repo;
pub mod document_repo;
pub mod intern_repo;
pub mod issued_document_repo;
pub mod notification_repo;
pub mod outbox_repo;
pub mod project_repo;
pub mod task_repo;
pub mod user_repo;

pub use assignment_repo::AssignmentRepo;
pub use attendance_repo::AttendanceRepo;
pub use college_repo::CollegeRepo;
pub use document_repo::DocumentRepo;
pub use intern_repo::InternRepo;
pub use issued_document_repo::IssuedDocumentRepo;
pub use notification_repo::NotificationRepo;
pub use outbox_repo::OutboxRepo;
pub use project_repo::ProjectRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
