use axum::routing::post;
use axum::Router;

use crate::handlers::attendance;
use crate::state::AppState;

/// Routes mounted at `/attendance`.
///
/// ```text
/// POST   /{entry_id}/confirm   -> confirm
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{entry_id}/confirm", post(attendance::confirm))
}
