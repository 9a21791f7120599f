use anyhow::{bail, Context, Result};
use clap::Args;

use crate::session::Session;
use crate::store::StoreError;
use crate::telemetry::{self};
use crate::telemetry::ops::user::Phase as UserPhase;

pub mod db;
pub mod types;

use types::{User, UserList, UserRow};

/// gator register <name>
#[derive(Args, Debug)]
pub struct RegisterCmd {
    pub name: String,
}

/// gator login <name>
#[derive(Args, Debug)]
pub struct LoginCmd {
    pub name: String,
}

pub async fn register(session: &mut Session, args: RegisterCmd) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span_kv([("name", args.name.clone())]).entered();
    let name = validate_name(&args.name)?;

    let _s = log.span(&UserPhase::Register).entered();
    let user = match db::create_user(session.pool(), name).await {
        Ok(u) => u,
        Err(StoreError::Duplicate(_)) => bail!("user {name} already exists"),
        Err(e) => return Err(e).context("failed to create user"),
    };
    session.set_current_user(&user.name)?;
    log.info(format!("👤 User {} registered and logged in", user.name));
    if telemetry::config::json_mode() {
        log.result(&user)?;
    }
    Ok(())
}

pub async fn login(session: &mut Session, args: LoginCmd) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span_kv([("name", args.name.clone())]).entered();
    let name = validate_name(&args.name)?;

    let _s = log.span(&UserPhase::Login).entered();
    let Some(user) = db::get_user_by_name(session.pool(), name).await? else {
        bail!("user {name} not found; register first");
    };
    session.set_current_user(&user.name)?;
    log.info(format!("🔑 User set to {}", user.name));
    if telemetry::config::json_mode() {
        log.result(&user)?;
    }
    Ok(())
}

pub async fn list(session: &Session) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::List).entered();

    let users = db::list_users(session.pool()).await.context("failed to list users")?;
    let rows = user_rows(&users, session.current_user_name());
    if rows.is_empty() {
        log.info("No users found.");
    }
    for row in &rows {
        if row.current { log.info(format!("* {} (current)", row.name)); }
        else { log.info(format!("* {}", row.name)); }
    }
    if telemetry::config::json_mode() {
        log.result(&UserList { users: rows })?;
    }
    Ok(())
}

pub async fn reset(session: &Session) -> Result<()> {
    let log = telemetry::user();
    let _g = log.root_span().entered();
    let _s = log.span(&UserPhase::Reset).entered();

    let counts = db::reset_all(session.pool()).await.context("failed to reset database")?;
    log.info(format!(
        "🧹 Reset: users={} feeds={} follows={} posts={}",
        counts.users, counts.feeds, counts.follows, counts.posts
    ));
    if telemetry::config::json_mode() {
        log.result(&counts)?;
    }
    Ok(())
}

fn validate_name(raw: &str) -> Result<&str> {
    let name = raw.trim();
    if name.is_empty() { bail!("username must not be empty"); }
    Ok(name)
}

fn user_rows(users: &[User], current: &str) -> Vec<UserRow> {
    users
        .iter()
        .map(|u| UserRow { name: u.name.clone(), current: u.name == current })
        .collect()
}
