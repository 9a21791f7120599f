use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{unique_or, StoreError};

use super::types::{ResetCounts, User};

pub async fn get_user_by_name(pool: &PgPool, name: &str) -> Result<Option<User>, StoreError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, created_at, updated_at, name
        FROM users
        WHERE name = $1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create_user(pool: &PgPool, name: &str) -> Result<User, StoreError> {
    let now = Utc::now();
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, created_at, updated_at, name)
        VALUES ($1, $2, $2, $3)
        RETURNING id, created_at, updated_at, name
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(now)
    .bind(name)
    .fetch_one(pool)
    .await
    .map_err(|e| unique_or(e, format!("user {name}")))
}

pub async fn list_users(pool: &PgPool) -> Result<Vec<User>, StoreError> {
    let rows = sqlx::query_as::<_, User>(
        r#"
        SELECT id, created_at, updated_at, name
        FROM users
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

// Children first so the counts reflect what each statement removed.
pub async fn reset_all(pool: &PgPool) -> Result<ResetCounts, StoreError> {
    let mut tx = pool.begin().await?;
    let posts = sqlx::query("DELETE FROM posts").execute(&mut *tx).await?.rows_affected();
    let follows = sqlx::query("DELETE FROM feed_follows").execute(&mut *tx).await?.rows_affected();
    let feeds = sqlx::query("DELETE FROM feeds").execute(&mut *tx).await?.rows_affected();
    let users = sqlx::query("DELETE FROM users").execute(&mut *tx).await?.rows_affected();
    tx.commit().await?;
    Ok(ResetCounts { posts, follows, feeds, users })
}
