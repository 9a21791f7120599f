use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{unique_or, Feed, FeedStore, NewPost, Post, StoreError};

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self { Self { pool } }
}

#[async_trait]
impl FeedStore for PgStore {
    async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError> {
        let feed = sqlx::query_as::<_, Feed>(
            r#"
            SELECT id, created_at, updated_at, name, url, user_id, last_fetched_at
            FROM feeds
            ORDER BY last_fetched_at ASC NULLS FIRST, created_at ASC
            LIMIT 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;
        feed.ok_or_else(|| StoreError::NotFound("no feeds to fetch".to_string()))
    }

    async fn mark_fetched(&self, feed_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let res = sqlx::query(
            r#"
            UPDATE feeds
            SET last_fetched_at = $2, updated_at = $2
            WHERE id = $1
            "#,
        )
        .bind(feed_id)
        .bind(at)
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("feed {feed_id}")));
        }
        Ok(())
    }

    async fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError> {
        let post = sqlx::query_as::<_, Post>(
            r#"
            SELECT id, created_at, updated_at, feed_id, title, url, description, published_at
            FROM posts
            WHERE url = $1
            "#,
        )
        .bind(url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(post)
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let now = Utc::now();
        let res = sqlx::query_as::<_, Post>(
            r#"
            INSERT INTO posts (id, created_at, updated_at, feed_id, title, url, description, published_at)
            VALUES ($1, $2, $2, $3, $4, $5, $6, $7)
            RETURNING id, created_at, updated_at, feed_id, title, url, description, published_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(now)
        .bind(post.feed_id)
        .bind(&post.title)
        .bind(&post.url)
        .bind(&post.description)
        .bind(post.published_at)
        .fetch_one(&self.pool)
        .await;
        res.map_err(|e| unique_or(e, post.url))
    }
}
