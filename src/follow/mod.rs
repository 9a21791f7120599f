use anyhow::{anyhow, bail, Context, Result};
use clap::Args;

use crate::feed::{self, validate_feed_url};
use crate::session::Session;
use crate::store::{Feed, StoreError};
use crate::telemetry::{self};
use crate::telemetry::ops::follow::Phase as FollowPhase;

pub mod db;
pub mod types;

use types::{FollowChange, FollowList};

/// gator follow <url>
#[derive(Args, Debug)]
pub struct FollowCmd {
    pub url: String,
}

/// gator unfollow <url>
#[derive(Args, Debug)]
pub struct UnfollowCmd {
    pub url: String,
}

pub async fn follow(session: &Session, args: FollowCmd) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span_kv([("url", args.url.clone())]).entered();
    let user = session.require_user().await?;
    let feed = resolve_feed(session, &args.url).await?;

    let _s = log.span(&FollowPhase::Follow).entered();
    match db::create_follow(session.pool(), user.id, feed.id).await {
        Ok(_) => {}
        Err(StoreError::Duplicate(_)) => bail!("{} already follows {}", user.name, feed.url),
        Err(e) => return Err(e).context("failed to create feed follow"),
    }
    log.info(format!("👀 {} now follows {:?} ({})", user.name, feed.name, feed.url));
    if telemetry::config::json_mode() {
        log.result(&FollowChange { user: user.name, feed_url: feed.url, following: true })?;
    }
    Ok(())
}

pub async fn unfollow(session: &Session, args: UnfollowCmd) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span_kv([("url", args.url.clone())]).entered();
    let user = session.require_user().await?;
    let feed = resolve_feed(session, &args.url).await?;

    let _s = log.span(&FollowPhase::Unfollow).entered();
    let removed = db::delete_follow(session.pool(), user.id, feed.id)
        .await
        .context("failed to unfollow feed")?;
    if removed == 0 {
        bail!("{} does not follow {}", user.name, feed.url);
    }
    log.info(format!("👋 {} unfollowed {:?} ({})", user.name, feed.name, feed.url));
    if telemetry::config::json_mode() {
        log.result(&FollowChange { user: user.name, feed_url: feed.url, following: false })?;
    }
    Ok(())
}

pub async fn following(session: &Session) -> Result<()> {
    let log = telemetry::follow();
    let _g = log.root_span().entered();
    let user = session.require_user().await?;

    let _s = log.span(&FollowPhase::List).entered();
    let follows = db::list_follows_for_user(session.pool(), user.id)
        .await
        .context("failed to list feed follows")?;
    if follows.is_empty() {
        log.info(format!("{} is not following any feeds.", user.name));
    } else {
        log.info(format!("Feeds followed by {}:", user.name));
    }
    for row in &follows {
        log.info(format!("* {} ({})", row.feed_name, row.feed_url));
    }
    if telemetry::config::json_mode() {
        log.result(&FollowList { user: user.name, follows })?;
    }
    Ok(())
}

async fn resolve_feed(session: &Session, raw_url: &str) -> Result<Feed> {
    let url = validate_feed_url(raw_url)?;
    feed::db::get_feed_by_url(session.pool(), &url)
        .await
        .context("failed to look up feed")?
        .ok_or_else(|| anyhow!("feed {url} not found; add it with `gator addfeed <name> {url}`"))
}
