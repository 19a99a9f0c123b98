//! Handlers for the `/manager` resource.

use axum::extract::State;
use axum::Json;

use cohort_db::repositories::InternRepo;

use crate::error::AppResult;
use crate::lifecycle::{intern_response, InternResponse};
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/manager/interns
///
/// Interns assigned to any of the caller's projects.
pub async fn my_interns(
    RequireManager(user): RequireManager,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<InternResponse>>>> {
    let interns = InternRepo::list_for_manager(&state.pool, user.user_id).await?;
    let mut data = Vec::with_capacity(interns.len());
    for intern in interns {
        data.push(intern_response(&state.pool, intern).await?);
    }
    Ok(Json(DataResponse { data }))
}
