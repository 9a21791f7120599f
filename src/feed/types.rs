use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::Feed;

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FeedListRow {
    pub name: String,
    pub url: String,
    pub user_name: String,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
pub struct FeedList {
    pub feeds: Vec<FeedListRow>,
}

#[derive(Serialize)]
pub struct FeedAddResult {
    pub feed: Feed,
    pub followed: bool,
}
