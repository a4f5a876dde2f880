use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: &'static str,
}

#[utoipa::path(
    get,
    path = "/healthz",
    tag = "Health",
    operation_id = "healthz",
    summary = "Liveness and database check",
    responses(
        (status = 200, description = "Server and database are reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn healthz(State(state): State<AppState>) -> Result<Json<HealthResponse>, AppError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| AppError::Internal(format!("Database ping failed: {e}")))?;
    Ok(Json(HealthResponse { status: "ok" }))
}
