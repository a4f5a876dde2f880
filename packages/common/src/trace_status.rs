#[cfg(feature = "sea-orm")]
use sea_orm::prelude::StringLen;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Outcome recorded on a trace row.
///
/// When the `sea-orm` feature is enabled, this enum can be used directly in SeaORM entities.
/// Any other stored value fails to decode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[cfg_attr(
    feature = "sea-orm",
    derive(sea_orm::DeriveActiveEnum, sea_orm::EnumIter),
    sea_orm(rs_type = "String", db_type = "String(StringLen::None)")
)]
#[serde(rename_all = "lowercase")]
pub enum TraceStatus {
    /// The file reached object storage.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "uploaded"))]
    Uploaded,
    /// The storage write failed; the row records the attempt only.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "failed"))]
    Failed,
    /// A downstream consumer has indexed the file.
    #[cfg_attr(feature = "sea-orm", sea_orm(string_value = "processed"))]
    Processed,
}

impl TraceStatus {
    pub const ALL: &'static [TraceStatus] = &[Self::Uploaded, Self::Failed, Self::Processed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uploaded => "uploaded",
            Self::Failed => "failed",
            Self::Processed => "processed",
        }
    }
}

impl fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTraceStatus(pub String);

impl fmt::Display for UnknownTraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown trace status: {}", self.0)
    }
}

impl std::error::Error for UnknownTraceStatus {}

impl FromStr for TraceStatus {
    type Err = UnknownTraceStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownTraceStatus(s.to_string()))
    }
}
