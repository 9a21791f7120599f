use anyhow::{Context, Result};
use clap::Args;

use crate::session::Session;
use crate::telemetry::{self};
use crate::telemetry::ops::browse::Phase as BrowsePhase;

mod db;
pub mod types;

use types::{BrowseResult, BrowseRow};

pub const DEFAULT_LIMIT: i64 = 2;

/// gator browse [limit]
#[derive(Args, Debug)]
pub struct BrowseCmd {
    /// Number of posts to show, newest first
    #[arg(default_value_t = DEFAULT_LIMIT, value_parser = clap::value_parser!(i64).range(1..))]
    pub limit: i64,
}

pub async fn run(session: &Session, args: BrowseCmd) -> Result<()> {
    let log = telemetry::browse();
    let _g = log.root_span_kv([("limit", args.limit.to_string())]).entered();
    let user = session.require_user().await?;

    let _s = log.span(&BrowsePhase::Select).entered();
    let posts = db::posts_for_user(session.pool(), user.id, args.limit)
        .await
        .context("failed to load posts")?;
    if posts.is_empty() {
        log.info(format!("No posts found for {}.", user.name));
    }
    for post in &posts {
        log.info(post_line(post));
    }
    if telemetry::config::json_mode() {
        log.result(&BrowseResult { user: user.name, posts })?;
    }
    Ok(())
}

fn post_line(post: &BrowseRow) -> String {
    format!(
        "📰 {} ({}) [{}] {}",
        post.title,
        post.published_at.format("%a, %d %b %Y %H:%M:%S UTC"),
        post.feed_name,
        post.url
    )
}
