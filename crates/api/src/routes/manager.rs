use axum::routing::get;
use axum::Router;

use crate::handlers::{attendance, manager};
use crate::state::AppState;

/// Routes mounted at `/manager`.
///
/// ```text
/// GET    /interns              -> my_interns
/// GET    /attendance/pending   -> pending
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/interns", get(manager::my_interns))
        .route("/attendance/pending", get(attendance::pending))
}
