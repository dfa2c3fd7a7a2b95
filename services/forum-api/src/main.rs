//! Forum API server
//!
//! Configuration is read from `config.toml`, the XDG and `/etc` search paths
//! and `FORUM_*` environment variables, e.g.
//!
//! ```text
//! FORUM_JWT__SECRET=change-me FORUM_BOOTSTRAP__ADMIN_NAME=root \
//! FORUM_BOOTSTRAP__ISSUE_ADMIN_TOKEN=true forum-api
//! ```

use anyhow::Context;
use forum_service::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("loading configuration")?;
    init_tracing(&config)?;

    let store = MemoryStore::new();
    if let Some(admin) = seed_admin(&store, &config.bootstrap)
        .await
        .context("seeding admin account")?
    {
        if config.bootstrap.issue_admin_token {
            let token = TokenIssuer::new(&config.jwt)
                .and_then(|issuer| issuer.issue_for(admin.id))
                .context("issuing admin token")?;
            info!(user_id = admin.id, token = %token, "admin token issued");
        }
    }

    let state = AppState::new(config.clone(), store);
    let app = build_router(state).context("building router")?;

    Server::new(config).serve(app).await?;
    shutdown_tracing();

    Ok(())
}
