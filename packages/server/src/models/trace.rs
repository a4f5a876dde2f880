use chrono::{DateTime, Utc};
use common::TraceStatus;
use serde::Serialize;
use uuid::Uuid;

use crate::entity::trace;

/// Response of a trace upload that stored the file.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadTraceResponse {
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    /// Public location of the stored file.
    #[schema(example = "https://storage.googleapis.com/bucket_name/Intro_Ada_Lovelace_CS_101_Fall_2024.pdf")]
    pub bucket_url: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TraceResponse {
    pub id: Uuid,
    /// Uploading user.
    pub user_id: Uuid,
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub status: TraceStatus,
    pub vector_id: Option<String>,
    #[schema(example = "Intro_Ada_Lovelace_CS_101_Fall_2024.pdf")]
    pub file_name: String,
    /// Empty when the storage write failed.
    pub bucket_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<trace::Model> for TraceResponse {
    fn from(model: trace::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            instructor_id: model.instructor_id,
            course_id: model.course_id,
            status: model.status,
            vector_id: model.vector_id,
            file_name: model.file_name,
            bucket_url: model.bucket_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TraceListResponse {
    pub data: Vec<TraceResponse>,
}
