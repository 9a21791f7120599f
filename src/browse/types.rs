use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct BrowseRow {
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
    pub feed_name: String,
}

#[derive(Serialize)]
pub struct BrowseResult {
    pub user: String,
    pub posts: Vec<BrowseRow>,
}
