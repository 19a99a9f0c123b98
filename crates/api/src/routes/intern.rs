//! Route definitions for `/interns`.
//!
//! Literal `me` segments are matched before the `{id}` captures.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{assignment, attendance, intern, task};
use crate::state::AppState;

/// Routes mounted at `/interns`.
///
/// ```text
/// POST   /register                                  -> register (public)
///
/// GET    /me                                        -> me
/// POST   /me/attendance                             -> mark_today
/// GET    /me/attendance                             -> my_history
/// GET    /me/tasks                                  -> my_tasks
/// PATCH  /me/tasks/{task_id}                        -> update_mine
/// GET    /me/assignments                            -> my_assignments
/// GET    /me/documents                              -> my_documents
/// GET    /me/documents/{doc_id}                     -> download_document
/// GET    /me/notifications                          -> my_notifications
/// POST   /me/notifications/{id}/read                -> mark_notification_read
///
/// POST   /{id}/assignments                          -> assign
/// GET    /{id}/assignments                          -> list_for_intern
/// PATCH  /{id}/assignments/by-project/{project_id}  -> update_by_project
/// DELETE /{id}/assignments/by-project/{project_id}  -> remove_by_project
/// GET    /{id}/attendance                           -> intern_history
/// POST   /{id}/tasks                                -> create
/// GET    /{id}/tasks                                -> list_for_intern
/// PATCH  /{id}/tasks/{task_id}                      -> update
/// POST   /{id}/complete                             -> complete
/// ```
pub fn router() -> Router<AppState> {
    let me = Router::new()
        .route("/", get(intern::me))
        .route(
            "/attendance",
            get(attendance::my_history).post(attendance::mark_today),
        )
        .route("/tasks", get(task::my_tasks))
        .route("/tasks/{task_id}", patch(task::update_mine))
        .route("/assignments", get(intern::my_assignments))
        .route("/documents", get(intern::my_documents))
        .route("/documents/{doc_id}", get(intern::download_document))
        .route("/notifications", get(intern::my_notifications))
        .route(
            "/notifications/{id}/read",
            post(intern::mark_notification_read),
        );

    Router::new()
        .route("/register", post(intern::register))
        .nest("/me", me)
        .route(
            "/{id}/assignments",
            get(assignment::list_for_intern).post(assignment::assign),
        )
        .route(
            "/{id}/assignments/by-project/{project_id}",
            patch(assignment::update_by_project).delete(assignment::remove_by_project),
        )
        .route("/{id}/attendance", get(attendance::intern_history))
        .route("/{id}/tasks", get(task::list_for_intern).post(task::create))
        .route("/{id}/tasks/{task_id}", patch(task::update))
        .route("/{id}/complete", post(assignment::complete))
}
