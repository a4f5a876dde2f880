use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    CourseChanges, CourseRepo, EntityStore, InstructorRepo, NewCourse, NewTrace, NewUser,
    StoreError, TraceRepo, UserRepo,
};
use crate::entity::{course, instructor, trace, user};

/// In-process [`EntityStore`] for local runs and tests.
///
/// Mirrors the relational constraints of the schema: a course must point at an
/// existing instructor and usernames are unique. Trace references are not checked.
#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<HashMap<Uuid, course::Model>>,
    instructors: RwLock<HashMap<Uuid, instructor::Model>>,
    traces: RwLock<Vec<trace::Model>>,
    users: RwLock<HashMap<Uuid, user::Model>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored trace, in insertion order.
    pub async fn all_traces(&self) -> Vec<trace::Model> {
        self.traces.read().await.clone()
    }

    async fn ensure_instructor(&self, id: Uuid) -> Result<(), StoreError> {
        if self.instructors.read().await.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKey(format!("instructor {id} does not exist")))
        }
    }
}

#[async_trait]
impl CourseRepo for MemoryStore {
    async fn create_course(&self, new: NewCourse) -> Result<course::Model, StoreError> {
        self.ensure_instructor(new.instructor_id).await?;

        let now = Utc::now();
        let model = course::Model {
            id: Uuid::new_v4(),
            name: new.name,
            subject_code: new.subject_code,
            course_number: new.course_number,
            semester_term: new.semester_term,
            semester_year: new.semester_year,
            credit_hours: new.credit_hours,
            instructor_id: new.instructor_id,
            user_id: new.user_id,
            created_at: now,
            updated_at: now,
        };
        self.courses.write().await.insert(model.id, model.clone());
        Ok(model)
    }

    async fn get_course(&self, id: Uuid) -> Result<course::Model, StoreError> {
        self.courses
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("course"))
    }

    async fn update_course(
        &self,
        id: Uuid,
        changes: CourseChanges,
    ) -> Result<course::Model, StoreError> {
        if let Some(instructor_id) = changes.instructor_id {
            self.ensure_instructor(instructor_id).await?;
        }

        let mut courses = self.courses.write().await;
        let existing = courses.get_mut(&id).ok_or(StoreError::NotFound("course"))?;
        if changes.is_empty() {
            return Ok(existing.clone());
        }

        if let Some(name) = changes.name {
            existing.name = name;
        }
        if let Some(subject_code) = changes.subject_code {
            existing.subject_code = subject_code;
        }
        if let Some(course_number) = changes.course_number {
            existing.course_number = course_number;
        }
        if let Some(semester_term) = changes.semester_term {
            existing.semester_term = semester_term;
        }
        if let Some(semester_year) = changes.semester_year {
            existing.semester_year = semester_year;
        }
        if let Some(credit_hours) = changes.credit_hours {
            existing.credit_hours = credit_hours;
        }
        if let Some(instructor_id) = changes.instructor_id {
            existing.instructor_id = instructor_id;
        }
        existing.updated_at = Utc::now();

        Ok(existing.clone())
    }

    async fn delete_course(&self, id: Uuid) -> Result<(), StoreError> {
        self.courses
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound("course"))
    }
}

#[async_trait]
impl InstructorRepo for MemoryStore {
    async fn create_instructor(&self, name: String) -> Result<instructor::Model, StoreError> {
        let now = Utc::now();
        let model = instructor::Model {
            id: Uuid::new_v4(),
            name,
            created_at: now,
            updated_at: now,
        };
        self.instructors
            .write()
            .await
            .insert(model.id, model.clone());
        Ok(model)
    }

    async fn get_instructor(&self, id: Uuid) -> Result<instructor::Model, StoreError> {
        self.instructors
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound("instructor"))
    }

    async fn list_instructors(&self) -> Result<Vec<instructor::Model>, StoreError> {
        let mut all: Vec<_> = self.instructors.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }
}

#[async_trait]
impl TraceRepo for MemoryStore {
    async fn insert_trace(&self, new: NewTrace) -> Result<trace::Model, StoreError> {
        let now = Utc::now();
        let model = trace::Model {
            id: Uuid::new_v4(),
            user_id: new.user_id,
            instructor_id: new.instructor_id,
            course_id: new.course_id,
            status: new.status,
            vector_id: new.vector_id,
            file_name: new.file_name,
            bucket_url: new.bucket_url,
            created_at: now,
            updated_at: now,
        };
        self.traces.write().await.push(model.clone());
        Ok(model)
    }

    async fn list_traces(&self, course_id: Uuid) -> Result<Vec<trace::Model>, StoreError> {
        Ok(self
            .traces
            .read()
            .await
            .iter()
            .rev()
            .filter(|t| t.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn get_trace(
        &self,
        course_id: Uuid,
        trace_id: Uuid,
    ) -> Result<trace::Model, StoreError> {
        self.traces
            .read()
            .await
            .iter()
            .find(|t| t.id == trace_id && t.course_id == course_id)
            .cloned()
            .ok_or(StoreError::NotFound("trace"))
    }

    async fn delete_trace(&self, course_id: Uuid, trace_id: Uuid) -> Result<(), StoreError> {
        let mut traces = self.traces.write().await;
        let before = traces.len();
        traces.retain(|t| !(t.id == trace_id && t.course_id == course_id));
        if traces.len() == before {
            return Err(StoreError::NotFound("trace"));
        }
        Ok(())
    }
}

#[async_trait]
impl UserRepo for MemoryStore {
    async fn create_user(&self, new: NewUser) -> Result<user::Model, StoreError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == new.username) {
            return Err(StoreError::Conflict(format!(
                "username {} already exists",
                new.username
            )));
        }

        let model = user::Model {
            id: Uuid::new_v4(),
            username: new.username,
            password: new.password_hash,
            role: new.role,
            created_at: Utc::now(),
        };
        users.insert(model.id, model.clone());
        Ok(model)
    }

    async fn find_user_by_username(
        &self,
        username: &str,
    ) -> Result<Option<user::Model>, StoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }
}

#[async_trait]
impl EntityStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
