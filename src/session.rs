use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use sqlx::PgPool;

use crate::config::Config;
use crate::user::db::get_user_by_name;
use crate::user::types::User;

/// Everything a command needs for one invocation. Passed explicitly to each
/// handler; commands that change the logged-in user write through to the
/// settings file.
pub struct Session {
    pool: PgPool,
    config: Config,
    config_path: PathBuf,
}

impl Session {
    pub fn new(pool: PgPool, config: Config, config_path: PathBuf) -> Self {
        Self { pool, config, config_path }
    }

    pub fn pool(&self) -> &PgPool { &self.pool }

    pub fn current_user_name(&self) -> &str { &self.config.current_user }

    pub fn set_current_user(&mut self, name: &str) -> Result<()> {
        self.config
            .set_user(name, &self.config_path)
            .context("failed to save current user")
    }

    /// Resolve the logged-in user, for commands that act on their behalf.
    pub async fn require_user(&self) -> Result<User> {
        let name = self.current_user_name();
        if name.is_empty() {
            bail!("no user is currently logged in; run `gator login <name>` first");
        }
        get_user_by_name(&self.pool, name)
            .await
            .context("failed to look up current user")?
            .ok_or_else(|| anyhow!("current user {name} not found; register or log in again"))
    }
}
