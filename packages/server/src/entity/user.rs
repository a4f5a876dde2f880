use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role with access to course management and trace administration.
pub const ADMIN_ROLE: &str = "admin";

/// The role assigned to newly registered users.
pub const DEFAULT_ROLE: &str = "user";

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub username: String,
    /// Argon2 PHC string.
    pub password: String,
    pub role: String,

    pub created_at: DateTimeUtc,
}

impl Model {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

impl ActiveModelBehavior for ActiveModel {}
