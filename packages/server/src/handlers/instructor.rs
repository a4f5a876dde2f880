use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::body::AppJson;
use crate::models::instructor::*;
use crate::models::shared::validate_name;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Instructors",
    operation_id = "createInstructor",
    summary = "Create an instructor",
    description = "Requires the admin role.",
    request_body = CreateInstructorRequest,
    responses(
        (status = 201, description = "Instructor created", body = InstructorResponse),
        (status = 400, description = "Validation error", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_instructor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateInstructorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_name(&payload.name, "name")?;

    let instructor = state
        .store
        .create_instructor(payload.name.trim().to_string())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(InstructorResponse::from(instructor)),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Instructors",
    operation_id = "listInstructors",
    summary = "List instructors",
    responses(
        (status = 200, description = "All instructors ordered by name", body = InstructorListResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_instructors(
    State(state): State<AppState>,
) -> Result<Json<InstructorListResponse>, AppError> {
    let data = state
        .store
        .list_instructors()
        .await?
        .into_iter()
        .map(InstructorResponse::from)
        .collect();

    Ok(Json(InstructorListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/{instructor_id}",
    tag = "Instructors",
    operation_id = "getInstructor",
    summary = "Get an instructor",
    params(("instructor_id" = String, Path, description = "Instructor UUID")),
    responses(
        (status = 200, description = "Instructor", body = InstructorResponse),
        (status = 400, description = "Malformed instructor id", body = ErrorBody),
        (status = 404, description = "Instructor not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(instructor_id = %instructor_id))]
pub async fn get_instructor(
    State(state): State<AppState>,
    Path(instructor_id): Path<String>,
) -> Result<Json<InstructorResponse>, AppError> {
    let id = parse_id(&instructor_id, "instructor_id")?;
    let instructor = state.store.get_instructor(id).await?;
    Ok(Json(InstructorResponse::from(instructor)))
}
