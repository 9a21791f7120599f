use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{unique_or, StoreError};

use super::types::{FeedFollow, FollowRow};

pub async fn create_follow(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<FeedFollow, StoreError> {
    let now = Utc::now();
    sqlx::query_as::<_, FeedFollow>(
        r#"
        INSERT INTO feed_follows (id, created_at, updated_at, user_id, feed_id)
        VALUES ($1, $2, $2, $3, $4)
        RETURNING id, created_at, updated_at, user_id, feed_id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(user_id)
    .bind(feed_id)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_or(e, format!("follow of feed {feed_id}")))
}

pub async fn delete_follow(pool: &PgPool, user_id: Uuid, feed_id: Uuid) -> Result<u64, StoreError> {
    let res = sqlx::query(
        r#"
        DELETE FROM feed_follows
        WHERE user_id = $1 AND feed_id = $2
        "#,
    )
    .bind(user_id)
    .bind(feed_id)
    .execute(pool)
    .await?;
    Ok(res.rows_affected())
}

pub async fn list_follows_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<FollowRow>, StoreError> {
    let rows = sqlx::query_as::<_, FollowRow>(
        r#"
        SELECT f.name AS feed_name, f.url AS feed_url
        FROM feed_follows ff
        JOIN feeds f ON f.id = ff.feed_id
        WHERE ff.user_id = $1
        ORDER BY ff.created_at
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
