use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::shared::{validate_code, validate_name, validate_range};
use crate::entity::course;
use crate::error::AppError;
use crate::store::{CourseChanges, NewCourse};

const MAX_COURSE_NUMBER: i32 = 9999;
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2200;
const MAX_CREDIT_HOURS: i32 = 20;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateCourseRequest {
    #[schema(example = "Intro to Computing")]
    pub name: String,
    #[schema(example = "CS")]
    pub subject_code: String,
    #[schema(example = 101)]
    pub course_number: i32,
    #[schema(example = "Fall")]
    pub semester_term: String,
    #[schema(example = 2024)]
    pub semester_year: i32,
    #[schema(example = 4)]
    pub credit_hours: i32,
    pub instructor_id: Uuid,
}

/// Partial update. Absent fields are left unchanged.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateCourseRequest {
    pub name: Option<String>,
    pub subject_code: Option<String>,
    pub course_number: Option<i32>,
    pub semester_term: Option<String>,
    pub semester_year: Option<i32>,
    pub credit_hours: Option<i32>,
    pub instructor_id: Option<Uuid>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseResponse {
    pub id: Uuid,
    pub name: String,
    pub subject_code: String,
    pub course_number: i32,
    pub semester_term: String,
    pub semester_year: i32,
    pub credit_hours: i32,
    pub instructor_id: Uuid,
    /// User who created the course.
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<course::Model> for CourseResponse {
    fn from(model: course::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            subject_code: model.subject_code,
            course_number: model.course_number,
            semester_term: model.semester_term,
            semester_year: model.semester_year,
            credit_hours: model.credit_hours,
            instructor_id: model.instructor_id,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

fn validate_course_number(value: i32) -> Result<(), AppError> {
    validate_range(value, 1, MAX_COURSE_NUMBER, "course_number")
}

fn validate_year(value: i32) -> Result<(), AppError> {
    validate_range(value, MIN_YEAR, MAX_YEAR, "semester_year")
}

fn validate_credit_hours(value: i32) -> Result<(), AppError> {
    validate_range(value, 0, MAX_CREDIT_HOURS, "credit_hours")
}

pub fn validate_create_course(payload: &CreateCourseRequest) -> Result<(), AppError> {
    validate_name(&payload.name, "name")?;
    validate_code(&payload.subject_code, "subject_code")?;
    validate_course_number(payload.course_number)?;
    validate_code(&payload.semester_term, "semester_term")?;
    validate_year(payload.semester_year)?;
    validate_credit_hours(payload.credit_hours)?;
    Ok(())
}

pub fn validate_update_course(payload: &UpdateCourseRequest) -> Result<(), AppError> {
    if let Some(ref name) = payload.name {
        validate_name(name, "name")?;
    }
    if let Some(ref code) = payload.subject_code {
        validate_code(code, "subject_code")?;
    }
    if let Some(number) = payload.course_number {
        validate_course_number(number)?;
    }
    if let Some(ref term) = payload.semester_term {
        validate_code(term, "semester_term")?;
    }
    if let Some(year) = payload.semester_year {
        validate_year(year)?;
    }
    if let Some(hours) = payload.credit_hours {
        validate_credit_hours(hours)?;
    }
    Ok(())
}

impl CreateCourseRequest {
    pub fn into_new_course(self, user_id: Uuid) -> NewCourse {
        NewCourse {
            name: self.name.trim().to_string(),
            subject_code: self.subject_code,
            course_number: self.course_number,
            semester_term: self.semester_term,
            semester_year: self.semester_year,
            credit_hours: self.credit_hours,
            instructor_id: self.instructor_id,
            user_id,
        }
    }
}

impl From<UpdateCourseRequest> for CourseChanges {
    fn from(payload: UpdateCourseRequest) -> Self {
        Self {
            name: payload.name.map(|n| n.trim().to_string()),
            subject_code: payload.subject_code,
            course_number: payload.course_number,
            semester_term: payload.semester_term,
            semester_year: payload.semester_year,
            credit_hours: payload.credit_hours,
            instructor_id: payload.instructor_id,
        }
    }
}
