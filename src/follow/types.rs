use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, sqlx::FromRow)]
pub struct FeedFollow {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub feed_id: Uuid,
}

#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct FollowRow {
    pub feed_name: String,
    pub feed_url: String,
}

#[derive(Serialize)]
pub struct FollowList {
    pub user: String,
    pub follows: Vec<FollowRow>,
}

#[derive(Serialize)]
pub struct FollowChange {
    pub user: String,
    pub feed_url: String,
    pub following: bool,
}
