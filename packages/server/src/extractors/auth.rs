use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use uuid::Uuid;

use crate::entity::user::ADMIN_ROLE;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::hash;

/// User authenticated through `Authorization: Basic <credentials>`.
///
/// Add this as a handler parameter to require authentication.
/// Role checks happen via `require_admin()` in the handler body.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }

    /// Returns `Ok(())` for admins, `Err(PermissionDenied)` otherwise.
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(AppError::PermissionDenied)
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(credentials)) =
            TypedHeader::<Authorization<Basic>>::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::Unauthorized("Authentication required".into()))?;

        let user = state
            .store
            .find_user_by_username(credentials.username())
            .await?
            .ok_or_else(invalid_credentials)?;

        let password = credentials.password().to_string();
        let stored_hash = user.password.clone();
        let is_valid =
            tokio::task::spawn_blocking(move || hash::verify_password(&password, &stored_hash))
                .await
                .map_err(|e| AppError::Internal(format!("Password verify task failed: {e}")))?
                .map_err(|e| AppError::Internal(format!("Password verify error: {e}")))?;

        if !is_valid {
            return Err(invalid_credentials());
        }

        Ok(AuthUser {
            user_id: user.id,
            username: user.username,
            role: user.role,
        })
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid username or password".into())
}
