//! Startup seeding

use crate::config::BootstrapConfig;
use crate::models::{NewUser, User, ROLE_ADMIN};
use crate::repository::{ForumStore, RepositoryResult, UserRepository};

/// Create the configured admin account, if any
pub async fn seed_admin<S: ForumStore>(
    store: &S,
    config: &BootstrapConfig,
) -> RepositoryResult<Option<User>> {
    let Some(name) = config.admin_name.as_deref() else {
        return Ok(None);
    };

    let admin = store
        .users()
        .create(NewUser {
            name: Some(name.to_string()),
            role: Some(ROLE_ADMIN.to_string()),
            ..NewUser::default()
        })
        .await?;

    tracing::info!(user_id = admin.id, name = %admin.name, "admin account seeded");
    Ok(Some(admin))
}
