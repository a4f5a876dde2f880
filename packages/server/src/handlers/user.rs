use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::instrument;

use crate::entity::user::DEFAULT_ROLE;
use crate::error::{AppError, ErrorBody};
use crate::extractors::body::AppJson;
use crate::models::user::{CreateUserRequest, UserResponse, validate_create_user};
use crate::state::AppState;
use crate::store::{NewUser, StoreError};
use crate::utils::hash;

#[utoipa::path(
    post,
    path = "/",
    tag = "Users",
    operation_id = "createUser",
    summary = "Register a user",
    description = "Creates a user with the default role. Credentials are then used with HTTP Basic authentication.",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 409, description = "Username is already taken", body = ErrorBody),
    ),
)]
#[instrument(skip(state, payload), fields(username = %payload.username))]
pub async fn create_user(
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    validate_create_user(&payload)?;

    let password_hash = hash::hash_password(&payload.password)
        .map_err(|e| AppError::Internal(format!("Password hash error: {}", e)))?;

    let user = state
        .store
        .create_user(NewUser {
            username: payload.username.trim().to_string(),
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        })
        .await
        .map_err(|e| match e {
            StoreError::Conflict(_) => {
                tracing::debug!("Registration race: unique constraint caught on insert");
                AppError::Conflict("Username is already taken".into())
            }
            other => AppError::from(other),
        })?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}
