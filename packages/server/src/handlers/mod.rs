pub mod course;
pub mod health;
pub mod instructor;
pub mod metrics;
pub mod trace;
pub mod user;

use uuid::Uuid;

use crate::error::AppError;

/// Parse a path identifier, reporting a malformed one as a validation error.
pub(crate) fn parse_id(raw: &str, name: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation(format!("Invalid {name} format")))
}
