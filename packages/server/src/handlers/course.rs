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
use crate::models::course::*;
use crate::models::shared::MessageResponse;
use crate::state::AppState;
use crate::store::{CourseChanges, StoreError};

/// A course pointing at a missing instructor is a client error.
fn reference_error(message: &'static str) -> impl Fn(StoreError) -> AppError {
    move |err| match err {
        StoreError::ForeignKey(_) => AppError::Validation(message.into()),
        other => AppError::from(other),
    }
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Courses",
    operation_id = "createCourse",
    summary = "Create a course",
    description = "Creates a course owned by an existing instructor. Requires the admin role.",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Validation error or unknown instructor", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_course(&payload)?;

    let course = state
        .store
        .create_course(payload.into_new_course(auth_user.user_id))
        .await
        .map_err(reference_error("Invalid instructor_id"))?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(course))))
}

#[utoipa::path(
    get,
    path = "/{course_id}",
    tag = "Courses",
    operation_id = "getCourse",
    summary = "Get a course",
    params(("course_id" = String, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 400, description = "Malformed course id", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(course_id = %course_id))]
pub async fn get_course(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseResponse>, AppError> {
    let id = parse_id(&course_id, "course_id")?;
    let course = state.store.get_course(id).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    patch,
    path = "/{course_id}",
    tag = "Courses",
    operation_id = "updateCourse",
    summary = "Update a course",
    description = "Partially updates a course. Only provided fields are changed; an empty body returns the course unchanged. Requires the admin role.",
    params(("course_id" = String, Path, description = "Course UUID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 400, description = "Validation error or unknown instructor", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(course_id = %course_id))]
pub async fn update_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    auth_user.require_admin()?;
    let id = parse_id(&course_id, "course_id")?;
    validate_update_course(&payload)?;

    let course = state
        .store
        .update_course(id, CourseChanges::from(payload))
        .await
        .map_err(reference_error("Invalid user_id or instructor_id"))?;

    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    delete,
    path = "/{course_id}",
    tag = "Courses",
    operation_id = "deleteCourse",
    summary = "Delete a course",
    description = "Deletes a course. Its traces are kept. Requires the admin role.",
    params(("course_id" = String, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 400, description = "Malformed course id", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
        (status = 404, description = "Course not found", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user), fields(course_id = %course_id))]
pub async fn delete_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_admin()?;
    let id = parse_id(&course_id, "course_id")?;

    state.store.delete_course(id).await?;

    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
