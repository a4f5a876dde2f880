//! Repository interface over courses, instructors, users and traces.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::SeaOrmStore;

use async_trait::async_trait;
use common::TraceStatus;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

use crate::entity::{course, instructor, trace, user};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid reference: {0}")]
    ForeignKey(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error(transparent)]
    Db(#[from] DbErr),
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }
}

#[derive(Debug, Clone)]
pub struct NewCourse {
    pub name: String,
    pub subject_code: String,
    pub course_number: i32,
    pub semester_term: String,
    pub semester_year: i32,
    pub credit_hours: i32,
    pub instructor_id: Uuid,
    pub user_id: Uuid,
}

/// Partial update of a course. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CourseChanges {
    pub name: Option<String>,
    pub subject_code: Option<String>,
    pub course_number: Option<i32>,
    pub semester_term: Option<String>,
    pub semester_year: Option<i32>,
    pub credit_hours: Option<i32>,
    pub instructor_id: Option<Uuid>,
}

impl CourseChanges {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone)]
pub struct NewTrace {
    pub user_id: Uuid,
    pub instructor_id: Uuid,
    pub course_id: Uuid,
    pub status: TraceStatus,
    pub vector_id: Option<String>,
    pub file_name: String,
    pub bucket_url: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub role: String,
}

#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn create_course(&self, new: NewCourse) -> Result<course::Model, StoreError>;
    async fn get_course(&self, id: Uuid) -> Result<course::Model, StoreError>;
    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<course::Model, StoreError>;
    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait InstructorRepo: Send + Sync {
    async fn create_instructor(&self, name: String) -> Result<instructor::Model, StoreError>;
    async fn get_instructor(&self, id: Uuid) -> Result<instructor::Model, StoreError>;
    async fn list_instructors(&self) -> Result<Vec<instructor::Model>, StoreError>;
}

#[async_trait]
pub trait TraceRepo: Send + Sync {
    /// Insert a new trace row. The id and timestamps are assigned here.
    async fn insert_trace(&self, new: NewTrace) -> Result<trace::Model, StoreError>;
    /// Traces of a course, newest first.
    async fn list_traces(&self, course_id: Uuid) -> Result<Vec<trace::Model>, StoreError>;
    async fn get_trace(&self, course_id: Uuid, trace_id: Uuid)
    -> Result<trace::Model, StoreError>;
    async fn delete_trace(&self, course_id: Uuid, trace_id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError>;
    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StoreError>;
}

/// Everything the server needs from persistence.
#[async_trait]
pub trait EntityStore: CourseRepo + InstructorRepo + TraceRepo + UserRepo {
    /// Check that the backing database answers.
    async fn ping(&self) -> Result<(), StoreError>;
}
