use tracing::info;

use crate::config::AuthConfig;
use crate::entity::user::ADMIN_ROLE;
use crate::store::{EntityStore, NewUser, StoreError};
use crate::utils::hash;

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to hash admin password: {0}")]
    Hash(hash::HashError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create the configured bootstrap admin if no user with that name exists.
///
/// Returns `true` when a user was created.
pub async fn ensure_admin(store: &dyn EntityStore, auth: &AuthConfig) -> Result<bool, SeedError> {
    let (Some(username), Some(password)) = (&auth.admin_username, &auth.admin_password) else {
        return Ok(false);
    };

    if store.find_user_by_username(username).await?.is_some() {
        return Ok(false);
    }

    let password_hash = hash::hash_password(password).map_err(SeedError::Hash)?;
    let result = store
        .create_user(NewUser {
            username: username.clone(),
            password_hash,
            role: ADMIN_ROLE.to_string(),
        })
        .await;

    match result {
        Ok(user) => {
            info!(username = %user.username, "Seeded bootstrap admin");
            Ok(true)
        }
        // Another instance seeded it first.
        Err(StoreError::Conflict(_)) => Ok(false),
        Err(e) => Err(e.into()),
    }
}
