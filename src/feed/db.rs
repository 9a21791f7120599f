use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{unique_or, Feed, StoreError};

use super::types::FeedListRow;

pub async fn create_feed(pool: &PgPool, name: &str, url: &str, user_id: Uuid) -> Result<Feed, StoreError> {
    let now = Utc::now();
    sqlx::query_as::<_, Feed>(
        r#"
        INSERT INTO feeds (id, created_at, updated_at, name, url, user_id, last_fetched_at)
        VALUES ($1, $2, $2, $3, $4, $5, NULL)
        RETURNING id, created_at, updated_at, name, url, user_id, last_fetched_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(name)
    .bind(url)
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_or(e, format!("feed {url}")))
}

pub async fn get_feed_by_url(pool: &PgPool, url: &str) -> Result<Option<Feed>, StoreError> {
    let feed = sqlx::query_as::<_, Feed>(
        r#"
        SELECT id, created_at, updated_at, name, url, user_id, last_fetched_at
        FROM feeds
        WHERE url = $1
        "#,
    )
    .bind(url)
    .fetch_optional(pool)
    .await?;
    Ok(feed)
}

pub async fn list_feeds(pool: &PgPool) -> Result<Vec<FeedListRow>, StoreError> {
    let rows = sqlx::query_as::<_, FeedListRow>(
        r#"
        SELECT f.name, f.url, u.name AS user_name, f.last_fetched_at
        FROM feeds f
        JOIN users u ON u.id = f.user_id
        ORDER BY f.created_at
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
