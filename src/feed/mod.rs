use anyhow::{bail, Context, Result};
use clap::Args;
use url::Url;

use crate::follow;
use crate::session::Session;
use crate::store::StoreError;
use crate::telemetry::{self};
use crate::telemetry::ops::feed::Phase as FeedPhase;

pub mod db;
pub mod types;

/// gator addfeed <name> <url>
#[derive(Args, Debug)]
pub struct AddFeedCmd {
    pub name: String,
    pub url: String,
}

pub async fn add_feed(session: &Session, args: AddFeedCmd) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span_kv([("name", args.name.clone()), ("url", args.url.clone())]).entered();

    // friendly error before DB I/O
    let url = validate_feed_url(&args.url)?;
    let name = args.name.trim();
    if name.is_empty() { bail!("feed name must not be empty"); }
    let user = session.require_user().await?;

    let _s = log.span(&FeedPhase::Add).entered();
    let feed = match db::create_feed(session.pool(), name, &url, user.id).await {
        Ok(f) => f,
        Err(StoreError::Duplicate(_)) => bail!("feed {url} already exists; use `gator follow {url}`"),
        Err(e) => return Err(e).context("failed to create feed"),
    };
    log.info(format!("➕ Feed {:?} ({}) added for {}", feed.name, feed.url, user.name));

    follow::db::create_follow(session.pool(), user.id, feed.id)
        .await
        .context("failed to follow new feed")?;
    log.info(format!("👀 {} now follows {:?}", user.name, feed.name));

    if telemetry::config::json_mode() {
        log.result(&types::FeedAddResult { feed, followed: true })?;
    }
    Ok(())
}

pub async fn list_feeds(session: &Session) -> Result<()> {
    let log = telemetry::feed();
    let _g = log.root_span().entered();
    let _s = log.span(&FeedPhase::List).entered();

    let feeds = db::list_feeds(session.pool()).await.context("failed to list feeds")?;
    if feeds.is_empty() {
        log.info("No feeds found.");
    }
    for row in &feeds {
        log.info(format!(
            "📡 {} {} by={} last_fetched_at={:?}",
            row.name, row.url, row.user_name, row.last_fetched_at
        ));
    }
    if telemetry::config::json_mode() {
        log.result(&types::FeedList { feeds })?;
    }
    Ok(())
}

/// Feeds are polled over HTTP, so only http(s) URLs are accepted.
pub fn validate_feed_url(raw: &str) -> Result<String> {
    let Ok(url) = Url::parse(raw.trim()) else { bail!("Invalid URL: {}", raw) };
    if !matches!(url.scheme(), "http" | "https") {
        bail!("Invalid URL: {} (expected http or https)", raw);
    }
    Ok(url.to_string())
}
