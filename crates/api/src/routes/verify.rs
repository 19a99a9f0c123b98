//! Public routes for letter verification. No authentication.

use axum::routing::get;
use axum::Router;

use crate::handlers::verify;
use crate::state::AppState;

/// Routes mounted at `/verify`.
///
/// ```text
/// GET    /{reference_code}            -> verify
/// GET    /{reference_code}/document   -> document
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{reference_code}", get(verify::verify))
        .route("/{reference_code}/document", get(verify::document))
}
