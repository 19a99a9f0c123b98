//! Handlers for the `/auth` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;

use cohort_core::error::CoreError;
use cohort_db::models::user::UserResponse;
use cohort_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::lifecycle::accounts::{self, ChangePasswordRequest, LoginRequest, LoginResponse};
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<DataResponse<LoginResponse>>> {
    let data = accounts::login(&state, &input).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let account = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: UserResponse::from(&account),
    }))
}

/// POST /api/v1/auth/change-password
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    accounts::change_password(&state.pool, user.user_id, &input).await?;
    Ok(StatusCode::NO_CONTENT)
}
