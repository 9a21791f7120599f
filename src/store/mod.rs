//! Persistence seam for the polling pipeline.
//!
//! The scheduler and ingestion engine only ever talk to a [`FeedStore`]; the
//! Postgres implementation lives in [`pg`], and an in-memory one is available
//! to tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

pub mod pg;
#[cfg(test)]
pub mod memory;

pub use pg::PgStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("duplicate: {0}")]
    Duplicate(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Map a unique-constraint violation to [`StoreError::Duplicate`].
pub(crate) fn unique_or(err: sqlx::Error, what: impl Into<String>) -> StoreError {
    match err {
        sqlx::Error::Database(e) if e.is_unique_violation() => StoreError::Duplicate(what.into()),
        e => StoreError::Database(e),
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Feed {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub name: String,
    pub url: String,
    pub user_id: Uuid,
    pub last_fetched_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
}

/// Fields the ingestion engine supplies for a new post; ids and creation
/// times are assigned by the store.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPost {
    pub feed_id: Uuid,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub published_at: DateTime<Utc>,
}

#[async_trait]
pub trait FeedStore: Send + Sync {
    /// The feed fetched longest ago, never-fetched feeds first.
    /// Fails with [`StoreError::NotFound`] when no feeds exist.
    async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError>;

    async fn mark_fetched(&self, feed_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError>;

    async fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if a post with the same URL exists.
    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError>;
}
