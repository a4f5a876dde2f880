use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::instructor;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateInstructorRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructorResponse {
    pub id: Uuid,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<instructor::Model> for InstructorResponse {
    fn from(model: instructor::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct InstructorListResponse {
    pub data: Vec<InstructorResponse>,
}
