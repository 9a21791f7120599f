use sqlx::PgPool;
use uuid::Uuid;

use crate::store::StoreError;

use super::types::BrowseRow;

pub async fn posts_for_user(pool: &PgPool, user_id: Uuid, limit: i64) -> Result<Vec<BrowseRow>, StoreError> {
    let rows = sqlx::query_as::<_, BrowseRow>(
        r#"
        SELECT p.title, p.url, p.description, p.published_at, f.name AS feed_name
        FROM posts p
        JOIN feed_follows ff ON ff.feed_id = p.feed_id
        JOIN feeds f ON f.id = p.feed_id
        WHERE ff.user_id = $1
        ORDER BY p.published_at DESC, p.created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}
