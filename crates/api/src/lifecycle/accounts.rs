//! Login, password changes and staff accounts.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use cohort_core::credentials::generate_temp_credential;
use cohort_core::error::CoreError;
use cohort_core::notify::credential_email;
use cohort_core::registration::is_valid_email;
use cohort_core::roles::{ROLE_ADMIN, ROLE_MANAGER};
use cohort_core::types::DbId;
use cohort_db::models::outbox::kinds;
use cohort_db::models::user::{CreateUser, User, UserResponse};
use cohort_db::repositories::{OutboxRepo, UserRepo};

use super::{deliver_now, required_text};
use crate::auth::jwt::{generate_access_token, TokenSubject};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::config::BootstrapAdmin;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful authentication response.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// Request body for `POST /auth/change-password`.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Request body for `POST /admin/managers`.
#[derive(Debug, Deserialize)]
pub struct CreateManagerRequest {
    pub full_name: String,
    pub email: String,
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn hashing_error(e: argon2::password_hash::Error) -> AppError {
    AppError::InternalError(format!("Credential hashing error: {e}"))
}

/// Authenticate any role by email.
///
/// Unknown email, wrong credential and a not-yet-activated account are
/// reported distinctly.
pub async fn login(state: &AppState, req: &LoginRequest) -> AppResult<LoginResponse> {
    let user = UserRepo::find_by_email(&state.pool, &normalize_email(&req.email))
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "No account found for this email".into(),
            ))
        })?;

    let not_activated = || AppError::Core(CoreError::Forbidden("Account is not activated yet".into()));
    if !user.is_active {
        return Err(not_activated());
    }
    let hash = user.password_hash.as_deref().ok_or_else(not_activated)?;

    let valid = verify_password(&req.password, hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect password".into(),
        )));
    }

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let access_token = generate_access_token(
        TokenSubject {
            user_id: user.id,
            role: &user.role,
            email: &user.email,
            name: &user.full_name,
        },
        &state.config.jwt,
    )
    .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "Login succeeded");

    Ok(LoginResponse {
        access_token,
        expires_in: state.config.jwt.access_token_expiry_mins * 60,
        user: UserResponse::from(&user),
    })
}

pub async fn change_password(
    pool: &PgPool,
    user_id: DbId,
    req: &ChangePasswordRequest,
) -> AppResult<()> {
    let user = UserRepo::find_by_id(pool, user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user_id,
        }))?;

    let current_ok = match user.password_hash.as_deref() {
        Some(hash) => verify_password(&req.current_password, hash)
            .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?,
        None => false,
    };
    if !current_ok {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Incorrect password".into(),
        )));
    }

    validate_password_strength(&req.new_password, MIN_PASSWORD_LENGTH)
        .map_err(|msg| AppError::Core(CoreError::Validation(msg)))?;

    let new_hash = hash_password(&req.new_password).map_err(hashing_error)?;
    UserRepo::update_password(pool, user_id, &new_hash).await?;

    tracing::info!(user_id, "Password changed");
    Ok(())
}

/// Create a manager account and email its temporary credential.
///
/// The account is committed before delivery; a failed send surfaces as
/// [`AppError::NotificationPending`] with the email left in the outbox.
pub async fn create_manager(state: &AppState, req: &CreateManagerRequest) -> AppResult<User> {
    let full_name = required_text(&req.full_name, "full_name")?.to_string();
    let email = normalize_email(&req.email);
    if !is_valid_email(&email) {
        return Err(AppError::Core(CoreError::Validation(
            "Email address is not valid".into(),
        )));
    }

    let temp_credential = generate_temp_credential();
    let password_hash = hash_password(&temp_credential).map_err(hashing_error)?;

    let mut tx = state.pool.begin().await?;
    let user = UserRepo::create(
        &mut *tx,
        &CreateUser {
            role: ROLE_MANAGER.to_string(),
            full_name,
            email,
            password_hash: Some(password_hash),
            is_active: true,
        },
    )
    .await?;
    let entry = OutboxRepo::enqueue(
        &mut *tx,
        None,
        kinds::CREDENTIALS,
        &credential_email(&user.email, &user.full_name, &temp_credential),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(user_id = user.id, "Manager account created");

    deliver_now(&state.outbox, &entry).await?;
    Ok(user)
}

/// Seed the first admin account when none exists.
///
/// Returns `true` if an account was created.
pub async fn bootstrap_admin(pool: &PgPool, admin: &BootstrapAdmin) -> AppResult<bool> {
    if UserRepo::exists_with_role(pool, ROLE_ADMIN).await? {
        return Ok(false);
    }

    let password_hash = hash_password(&admin.password).map_err(hashing_error)?;
    let user = UserRepo::create(
        pool,
        &CreateUser {
            role: ROLE_ADMIN.to_string(),
            full_name: "Administrator".to_string(),
            email: normalize_email(&admin.email),
            password_hash: Some(password_hash),
            is_active: true,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, email = %user.email, "Bootstrap admin created");
    Ok(true)
}
