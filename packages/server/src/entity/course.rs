use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "course")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub subject_code: String, // e.g. "CS"
    pub course_number: i32,   // e.g. 101
    pub semester_term: String,
    pub semester_year: i32,
    pub credit_hours: i32,

    pub instructor_id: Uuid,
    #[sea_orm(belongs_to, from = "instructor_id", to = "id")]
    pub instructor: HasOne<super::instructor::Entity>,

    /// User who created the course.
    pub user_id: Uuid,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
