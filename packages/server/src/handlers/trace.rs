use std::io::Cursor;

use axum::{
    Json,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::TraceStatus;
use tracing::instrument;

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::body::AppMultipart;
use crate::models::shared::MessageResponse;
use crate::models::trace::*;
use crate::state::AppState;
use crate::trace::{TraceUpload, TraceUploadError};

/// Room for multipart boundaries and the non-file fields.
const FORM_OVERHEAD: usize = 1024 * 1024;

pub fn trace_upload_body_limit(max_upload_size: u64) -> DefaultBodyLimit {
    let max = usize::try_from(max_upload_size).unwrap_or(usize::MAX);
    DefaultBodyLimit::max(max.saturating_add(FORM_OVERHEAD))
}

/// Fields of the upload form.
struct TraceForm {
    file: Vec<u8>,
    vector_id: Option<String>,
}

async fn read_trace_form(multipart: &mut Multipart, max_size: u64) -> Result<TraceForm, AppError> {
    let mut file: Option<Vec<u8>> = None;
    let mut vector_id: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read multipart field: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let mut data = Vec::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
                {
                    if (data.len() + chunk.len()) as u64 > max_size {
                        return Err(AppError::Validation(format!(
                            "File exceeds maximum size of {max_size} bytes"
                        )));
                    }
                    data.extend_from_slice(&chunk);
                }
                file = Some(data);
            }
            Some("vector_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read vector_id: {e}")))?;
                vector_id = (!text.is_empty()).then_some(text);
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let file = file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    Ok(TraceForm { file, vector_id })
}

fn upload_error(err: TraceUploadError) -> AppError {
    let message = match err {
        TraceUploadError::Course(_) => "Failed to fetch course details",
        TraceUploadError::Instructor(_) => "Failed to fetch instructor details",
        TraceUploadError::Persist(_) => "Failed to insert trace record",
    };
    AppError::Failure(message.into())
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Traces",
    operation_id = "uploadTrace",
    summary = "Upload a trace file for a course",
    description = "Stores the `file` multipart field (at most the configured maximum, 10 MiB by default) \
        under a name derived from the course and instructor, and records a trace row. \
        An optional `vector_id` field is stored with the row. \
        A failed storage write is still recorded, with status `failed`, and answered with 500. \
        An unknown course is reported as 500, not 404.",
    params(("course_id" = String, Path, description = "Course UUID")),
    request_body(content_type = "multipart/form-data", description = "`file` (binary, required) and `vector_id` (text, optional)"),
    responses(
        (status = 201, description = "File stored and trace recorded", body = UploadTraceResponse),
        (status = 400, description = "Malformed course id or form", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 500, description = "Course lookup, storage or trace persistence failed", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(course_id = %course_id, user = %auth_user.username))]
pub async fn upload_trace(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    AppMultipart(mut multipart): AppMultipart,
) -> Result<impl IntoResponse, AppError> {
    let course_id = parse_id(&course_id, "course_id")?;
    let form = read_trace_form(&mut multipart, state.config.storage.max_upload_size).await?;

    let trace = state
        .uploads
        .upload(TraceUpload {
            course_id,
            uploader_id: auth_user.user_id,
            payload: Box::new(Cursor::new(form.file)),
            vector_id: form.vector_id,
        })
        .await
        .map_err(upload_error)?;

    if trace.status != TraceStatus::Uploaded {
        return Err(AppError::Failure("Failed to upload file to storage".into()));
    }

    Ok((
        StatusCode::CREATED,
        Json(UploadTraceResponse {
            message: "File uploaded successfully".into(),
            bucket_url: trace.bucket_url,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Traces",
    operation_id = "listTraces",
    summary = "List traces of a course",
    description = "Returns every recorded upload attempt for the course, newest first, including failed ones. \
        Requires the admin role.",
    params(("course_id" = String, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Traces of the course", body = TraceListResponse),
        (status = 400, description = "Malformed course id", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user), fields(course_id = %course_id))]
pub async fn list_traces(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> Result<Json<TraceListResponse>, AppError> {
    auth_user.require_admin()?;
    let course_id = parse_id(&course_id, "course_id")?;

    let data = state
        .store
        .list_traces(course_id)
        .await?
        .into_iter()
        .map(TraceResponse::from)
        .collect();

    Ok(Json(TraceListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/{trace_id}",
    tag = "Traces",
    operation_id = "getTrace",
    summary = "Get a trace",
    description = "Requires the admin role.",
    params(
        ("course_id" = String, Path, description = "Course UUID"),
        ("trace_id" = String, Path, description = "Trace UUID"),
    ),
    responses(
        (status = 200, description = "Trace", body = TraceResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
        (status = 404, description = "Trace not found", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user), fields(course_id = %course_id, trace_id = %trace_id))]
pub async fn get_trace(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((course_id, trace_id)): Path<(String, String)>,
) -> Result<Json<TraceResponse>, AppError> {
    auth_user.require_admin()?;
    let course_id = parse_id(&course_id, "course_id")?;
    let trace_id = parse_id(&trace_id, "trace_id")?;

    let trace = state.store.get_trace(course_id, trace_id).await?;
    Ok(Json(TraceResponse::from(trace)))
}

#[utoipa::path(
    delete,
    path = "/{trace_id}",
    tag = "Traces",
    operation_id = "deleteTrace",
    summary = "Delete a trace",
    description = "Deletes the trace row. The stored object is left in place. Requires the admin role.",
    params(
        ("course_id" = String, Path, description = "Course UUID"),
        ("trace_id" = String, Path, description = "Trace UUID"),
    ),
    responses(
        (status = 200, description = "Trace deleted", body = MessageResponse),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 401, description = "Missing or invalid credentials", body = ErrorBody),
        (status = 403, description = "Insufficient permissions", body = ErrorBody),
        (status = 404, description = "Trace not found", body = ErrorBody),
    ),
    security(("basic" = [])),
)]
#[instrument(skip(state, auth_user), fields(course_id = %course_id, trace_id = %trace_id))]
pub async fn delete_trace(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path((course_id, trace_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    auth_user.require_admin()?;
    let course_id = parse_id(&course_id, "course_id")?;
    let trace_id = parse_id(&trace_id, "trace_id")?;

    state.store.delete_trace(course_id, trace_id).await?;

    Ok(Json(MessageResponse::new("Trace deleted successfully")))
}
