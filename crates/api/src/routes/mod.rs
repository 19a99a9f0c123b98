pub mod admin;
pub mod assignment;
pub mod attendance;
pub mod auth;
pub mod health;
pub mod intern;
pub mod manager;
pub mod project;
pub mod verify;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/me                                         current account
/// /auth/change-password                            change password
///
/// /interns/register                                registration (public)
/// /interns/me/...                                  intern self-service
/// /interns/{id}/assignments                        assign, list
/// /interns/{id}/assignments/by-project/{pid}       update first match, remove all
/// /interns/{id}/attendance                         history + summary
/// /interns/{id}/tasks                              create, list
/// /interns/{id}/tasks/{task_id}                    update
/// /interns/{id}/complete                           complete internship
///
/// /admin/interns                                   list (admin only)
/// /admin/interns/{id}                              get, delete
/// /admin/interns/{id}/activate                     activate
/// /admin/managers                                  list, create
/// /admin/managers/{id}                             delete
/// /admin/colleges                                  list, upsert
/// /admin/colleges/lookup                           lookup by name
/// /admin/outbox                                    list
/// /admin/outbox/{id}/retry                         retry delivery
/// /admin/reports/attendance                        JSON summary
/// /admin/reports/attendance.pdf                    PDF summary
///
/// /projects                                        list, create
/// /projects/{id}                                   get (with interns), update, delete
///
/// /assignments/{id}                                update, delete
///
/// /attendance/{entry_id}/confirm                   resolve an entry
///
/// /manager/interns                                 interns on own projects
/// /manager/attendance/pending                      pending entries
///
/// /verify/{reference_code}                         public verification
/// /verify/{reference_code}/document                public PDF
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/interns", intern::router())
        .nest("/admin", admin::router())
        .nest("/projects", project::router())
        .nest("/assignments", assignment::router())
        .nest("/attendance", attendance::router())
        .nest("/manager", manager::router())
        .nest("/verify", verify::router())
}
