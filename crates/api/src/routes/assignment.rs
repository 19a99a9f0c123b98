//! Route definitions for `/assignments`.

use axum::routing::patch;
use axum::Router;

use crate::handlers::assignment;
use crate::state::AppState;

/// Routes mounted at `/assignments`.
///
/// ```text
/// PATCH  /{id}   -> update
/// DELETE /{id}   -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/{id}",
        patch(assignment::update).delete(assignment::delete),
    )
}
