//! Route definitions for `/admin`.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /interns                     -> list_interns
/// GET    /interns/{id}                -> get_intern
/// DELETE /interns/{id}                -> delete_intern
/// POST   /interns/{id}/activate       -> activate_intern
///
/// GET    /managers                    -> list_managers
/// POST   /managers                    -> create_manager
/// DELETE /managers/{id}               -> delete_manager
///
/// GET    /colleges                    -> list_colleges
/// PUT    /colleges                    -> upsert_college
/// GET    /colleges/lookup?name=       -> lookup_college
///
/// GET    /outbox                      -> list_outbox
/// POST   /outbox/{id}/retry           -> retry_outbox_entry
///
/// GET    /reports/attendance          -> attendance_report
/// GET    /reports/attendance.pdf      -> attendance_report_pdf
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interns", get(admin::list_interns))
        .route(
            "/interns/{id}",
            get(admin::get_intern).delete(admin::delete_intern),
        )
        .route("/interns/{id}/activate", post(admin::activate_intern))
        .route(
            "/managers",
            get(admin::list_managers).post(admin::create_manager),
        )
        .route("/managers/{id}", delete(admin::delete_manager))
        .route(
            "/colleges",
            get(admin::list_colleges).put(admin::upsert_college),
        )
        .route("/colleges/lookup", get(admin::lookup_college))
        .route("/outbox", get(admin::list_outbox))
        .route("/outbox/{id}/retry", post(admin::retry_outbox_entry))
        .route("/reports/attendance", get(admin::attendance_report))
        .route(
            "/reports/attendance.pdf",
            get(admin::attendance_report_pdf),
        )
}
