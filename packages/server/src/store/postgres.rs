use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use uuid::Uuid;

use super::{
    CourseChanges, CourseRepo, EntityStore, InstructorRepo, NewCourse, NewTrace, NewUser,
    StoreError, TraceRepo, UserRepo,
};
use crate::entity::{course, instructor, trace, user};

/// [`EntityStore`] over a pooled SeaORM connection.
#[derive(Clone)]
pub struct SeaOrmStore {
    db: DatabaseConnection,
}

impl SeaOrmStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

/// Classify constraint violations raised by a write.
fn write_error(err: DbErr) -> StoreError {
    match err.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => StoreError::ForeignKey(detail),
        Some(SqlErr::UniqueConstraintViolation(detail)) => StoreError::Conflict(detail),
        _ => StoreError::Db(err),
    }
}

#[async_trait]
impl CourseRepo for SeaOrmStore {
    async fn create_course(&self, new: NewCourse) -> Result<course::Model, StoreError> {
        let now = Utc::now();
        let model = course::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            subject_code: Set(new.subject_code),
            course_number: Set(new.course_number),
            semester_term: Set(new.semester_term),
            semester_year: Set(new.semester_year),
            credit_hours: Set(new.credit_hours),
            instructor_id: Set(new.instructor_id),
            user_id: Set(new.user_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(write_error)
    }

    async fn get_course(&self, id: Uuid) -> Result<course::Model, StoreError> {
        course::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("course"))
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<course::Model, StoreError> {
        let txn = self.db.begin().await?;

        let existing = course::Entity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or(StoreError::NotFound("course"))?;

        if changes.is_empty() {
            txn.commit().await?;
            return Ok(existing);
        }

        let mut active: course::ActiveModel = existing.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(subject_code) = changes.subject_code {
            active.subject_code = Set(subject_code);
        }
        if let Some(course_number) = changes.course_number {
            active.course_number = Set(course_number);
        }
        if let Some(semester_term) = changes.semester_term {
            active.semester_term = Set(semester_term);
        }
        if let Some(semester_year) = changes.semester_year {
            active.semester_year = Set(semester_year);
        }
        if let Some(credit_hours) = changes.credit_hours {
            active.credit_hours = Set(credit_hours);
        }
        if let Some(instructor_id) = changes.instructor_id {
            active.instructor_id = Set(instructor_id);
        }
        active.updated_at = Set(Utc::now());

        let updated = active.update(&txn).await.map_err(write_error)?;
        txn.commit().await?;

        Ok(updated)
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError> {
        let result = course::Entity::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("course"));
        }
        Ok(())
    }
}

#[async_trait]
impl InstructorRepo for SeaOrmStore {
    async fn create_instructor(&self, name: String) -> Result<instructor::Model, StoreError> {
        let now = Utc::now();
        let model = instructor::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        model.insert(&self.db).await.map_err(write_error)
    }

    async fn get_instructor(&self, id: Uuid) -> Result<instructor::Model, StoreError> {
        instructor::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("instructor"))
    }

    async fn list_instructors(&self) -> Result<Vec<instructor::Model>, StoreError> {
        Ok(instructor::Entity::find()
            .order_by_asc(instructor::Column::Name)
            .all(&self.db)
            .await?)
    }
}

#[async_trait]
impl TraceRepo for SeaOrmStore {
    async fn insert_trace(&self, new: NewTrace) -> Result<trace::Model, StoreError> {
        let now = Utc::now();
        let model = trace::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(new.user_id),
            instructor_id: Set(new.instructor_id),
            course_id: Set(new.course_id),
            status: Set(new.status),
            vector_id: Set(new.vector_id),
            file_name: Set(new.file_name),
            bucket_url: Set(new.bucket_url),
            created_at: Set(now),
            updated_at: Set(now),
        };

        model.insert(&self.db).await.map_err(write_error)
    }

    async fn list_traces(&self, course_id: Uuid) -> Result<Vec<trace::Model>, StoreError> {
        Ok(trace::Entity::find()
            .filter(trace::Column::CourseId.eq(course_id))
            .order_by_desc(trace::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    async fn get_trace(
        &self,
        course_id: Uuid,
        trace_id: Uuid,
    ) -> Result<trace::Model, StoreError> {
        trace::Entity::find_by_id(trace_id)
            .filter(trace::Column::CourseId.eq(course_id))
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound("trace"))
    }

    async fn delete_trace(&self, course_id: Uuid, trace_id: Uuid) -> Result<(), StoreError> {
        let result = trace::Entity::delete_many()
            .filter(trace::Column::Id.eq(trace_id))
            .filter(trace::Column::CourseId.eq(course_id))
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(StoreError::NotFound("trace"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for SeaOrmStore {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError> {
        let model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(new.username),
            password: Set(new.password_hash),
            role: Set(new.role),
            created_at: Set(Utc::now()),
        };

        model.insert(&self.db).await.map_err(write_error)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        Ok(user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl EntityStore for SeaOrmStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(self.db.ping().await?)
    }
}
