use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use sea_orm::DbErr;
use serde::Serialize;

use crate::store::StoreError;

/// Realm advertised in `WWW-Authenticate` on 401 responses.
pub const AUTH_REALM: &str = "Course Authentication Required";

/// Error response returned by all endpoints on failure.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Human-readable error description.
    #[schema(example = "Course not found")]
    pub error: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    /// Missing or invalid credentials.
    Unauthorized(String),
    PermissionDenied,
    NotFound(String),
    Conflict(String),
    /// Detail is logged, the client sees a generic message.
    Internal(String),
    /// Server-side failure whose message is meant for the client.
    Failure(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, ErrorBody { error: msg }),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, ErrorBody { error: msg }),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    error: "Insufficient permissions".into(),
                },
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorBody { error: msg }),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, ErrorBody { error: msg }),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: "An unexpected error occurred".into(),
                    },
                )
            }
            AppError::Failure(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorBody { error: msg },
            ),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let challenge = matches!(self, AppError::Unauthorized(_));
        let (status, body) = self.status_and_body();

        if challenge {
            (
                status,
                [(
                    header::WWW_AUTHENTICATE,
                    format!("Basic realm=\"{AUTH_REALM}\""),
                )],
                Json(body),
            )
                .into_response()
        } else {
            (status, Json(body)).into_response()
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(entity) => {
                AppError::NotFound(format!("{} not found", capitalize(entity)))
            }
            StoreError::Conflict(detail) => {
                tracing::warn!("Conflict: {detail}");
                AppError::Conflict("Resource already exists".into())
            }
            StoreError::ForeignKey(detail) => {
                tracing::warn!("Invalid reference: {detail}");
                AppError::Validation("Invalid reference".into())
            }
            StoreError::Db(e) => AppError::from(e),
        }
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
