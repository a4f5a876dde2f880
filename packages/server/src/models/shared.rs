use serde::Serialize;

use crate::error::AppError;

/// Plain confirmation returned by delete endpoints.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Course deleted successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate a trimmed display name (1-256 Unicode characters).
pub fn validate_name(value: &str, field: &str) -> Result<(), AppError> {
    let value = value.trim();
    if value.is_empty() || value.chars().count() > 256 {
        return Err(AppError::Validation(format!(
            "{field} must be 1-256 characters"
        )));
    }
    Ok(())
}

/// Validate a short code of 1-16 ASCII letters and digits.
pub fn validate_code(value: &str, field: &str) -> Result<(), AppError> {
    if value.is_empty() || value.len() > 16 || !value.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::Validation(format!(
            "{field} must be 1-16 letters or digits"
        )));
    }
    Ok(())
}

/// Validate an inclusive integer range.
pub fn validate_range(value: i32, min: i32, max: i32, field: &str) -> Result<(), AppError> {
    if !(min..=max).contains(&value) {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max}"
        )));
    }
    Ok(())
}
