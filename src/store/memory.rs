use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Feed, FeedStore, NewPost, Post, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    feeds: Mutex<Vec<Feed>>,
    posts: Mutex<Vec<Post>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_feed(&self, name: &str, url: &str, last_fetched_at: Option<DateTime<Utc>>) -> Feed {
        let now = Utc::now();
        let feed = Feed {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            name: name.to_string(),
            url: url.to_string(),
            user_id: Uuid::nil(),
            last_fetched_at,
        };
        self.feeds.lock().unwrap().push(feed.clone());
        feed
    }

    pub fn feed(&self, id: Uuid) -> Option<Feed> {
        self.feeds.lock().unwrap().iter().find(|f| f.id == id).cloned()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.posts.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedStore for MemoryStore {
    async fn next_feed_to_fetch(&self) -> Result<Feed, StoreError> {
        let feeds = self.feeds.lock().unwrap();
        // None sorts before Some, matching NULLS FIRST
        feeds
            .iter()
            .min_by_key(|f| (f.last_fetched_at, f.created_at))
            .cloned()
            .ok_or_else(|| StoreError::NotFound("no feeds to fetch".to_string()))
    }

    async fn mark_fetched(&self, feed_id: Uuid, at: DateTime<Utc>) -> Result<(), StoreError> {
        let mut feeds = self.feeds.lock().unwrap();
        let feed = feeds
            .iter_mut()
            .find(|f| f.id == feed_id)
            .ok_or_else(|| StoreError::NotFound(format!("feed {feed_id}")))?;
        feed.last_fetched_at = Some(at);
        feed.updated_at = at;
        Ok(())
    }

    async fn get_post_by_url(&self, url: &str) -> Result<Option<Post>, StoreError> {
        Ok(self.posts.lock().unwrap().iter().find(|p| p.url == url).cloned())
    }

    async fn create_post(&self, post: NewPost) -> Result<Post, StoreError> {
        let mut posts = self.posts.lock().unwrap();
        if posts.iter().any(|p| p.url == post.url) {
            return Err(StoreError::Duplicate(post.url));
        }
        let now = Utc::now();
        let row = Post {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            feed_id: post.feed_id,
            title: post.title,
            url: post.url,
            description: post.description,
            published_at: post.published_at,
        };
        posts.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn new_post(feed_id: Uuid, url: &str) -> NewPost {
        NewPost {
            feed_id,
            title: "t".into(),
            url: url.into(),
            description: None,
            published_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn never_fetched_feed_is_most_stale() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.add_feed("old", "https://a/feed", Some(now - Duration::hours(2)));
        let fresh = store.add_feed("never", "https://b/feed", None);
        store.add_feed("new", "https://c/feed", Some(now));

        let next = store.next_feed_to_fetch().await.unwrap();
        assert_eq!(next.id, fresh.id);
    }

    #[tokio::test]
    async fn smaller_timestamp_wins_among_fetched() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.add_feed("new", "https://c/feed", Some(now));
        let old = store.add_feed("old", "https://a/feed", Some(now - Duration::hours(2)));

        assert_eq!(store.next_feed_to_fetch().await.unwrap().id, old.id);

        store.mark_fetched(old.id, now + Duration::seconds(1)).await.unwrap();
        assert_eq!(store.next_feed_to_fetch().await.unwrap().url, "https://c/feed");
    }

    #[tokio::test]
    async fn empty_store_has_no_next_feed() {
        let store = MemoryStore::new();
        let err = store.next_feed_to_fetch().await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_post_url_is_rejected() {
        let store = MemoryStore::new();
        let feed = store.add_feed("f", "https://a/feed", None);
        store.create_post(new_post(feed.id, "https://a/1")).await.unwrap();
        let err = store.create_post(new_post(feed.id, "https://a/1")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(url) if url == "https://a/1"));
        assert_eq!(store.posts().len(), 1);
    }
}
