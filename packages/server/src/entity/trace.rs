use common::TraceStatus;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One attempted document upload for a course.
///
/// The referenced user, instructor and course are plain columns: they are checked
/// when the row is written, and may dangle once those rows are deleted.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trace")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub user_id: Uuid,
    pub instructor_id: Uuid,
    #[sea_orm(indexed)]
    pub course_id: Uuid,

    pub status: TraceStatus,

    /// External vector/index identifier supplied by the uploader.
    pub vector_id: Option<String>,

    pub file_name: String,

    /// Public object location. Empty when the storage write failed.
    #[sea_orm(column_type = "Text")]
    pub bucket_url: String,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
