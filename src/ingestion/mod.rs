//! One ingestion pass: fetch a feed, stamp it as fetched, then persist every
//! item whose URL is not already stored.
//!
//! Posts are committed one at a time. If an item's date cannot be parsed the
//! pass stops there; items before it stay committed and are skipped as
//! duplicates on the next pass.

use chrono::Utc;
use thiserror::Error;
use tracing::Instrument;

use crate::store::{Feed, FeedStore, NewPost, StoreError};
use crate::telemetry::{self};
use crate::telemetry::ops::agg::Phase as AggPhase;

pub mod date;
pub mod fetch;
pub mod parse;
pub mod types;

use fetch::{FeedFetcher, FetchError};
use types::{FeedEntry, IngestSummary};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum IngestErrorKind {
    FetchFailed,
    UnparsableDate,
    Store,
}

impl IngestErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IngestErrorKind::FetchFailed => "fetch_failed",
            IngestErrorKind::UnparsableDate => "unparsable_date",
            IngestErrorKind::Store => "store",
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to fetch {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: FetchError,
    },
    #[error("unparsable publication date {raw:?} for {url}")]
    UnparsableDate { url: String, raw: String },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IngestError {
    pub fn kind(&self) -> IngestErrorKind {
        match self {
            IngestError::FetchFailed { .. } => IngestErrorKind::FetchFailed,
            IngestError::UnparsableDate { .. } => IngestErrorKind::UnparsableDate,
            IngestError::Store(_) => IngestErrorKind::Store,
        }
    }
}

pub async fn ingest_one_feed(
    store: &dyn FeedStore,
    fetcher: &dyn FeedFetcher,
    feed: &Feed,
) -> Result<IngestSummary, IngestError> {
    let log = telemetry::agg();

    let doc = fetcher
        .fetch(&feed.url)
        .instrument(log.span_kv(&AggPhase::Fetch, [("url", feed.url.clone())]))
        .await
        .map_err(|source| IngestError::FetchFailed { url: feed.url.clone(), source })?;

    // Stamp before touching items so a failure below never pins this feed
    // as the most stale one.
    store
        .mark_fetched(feed.id, Utc::now())
        .instrument(log.span(&AggPhase::MarkFetched))
        .await?;
    log.info_kv(
        "📡 fetched",
        [
            ("feed", feed.name.clone()),
            ("title", doc.title.clone()),
            ("items", doc.items.len().to_string()),
        ],
    );

    let mut summary = IngestSummary {
        feed_url: feed.url.clone(),
        channel_title: doc.title.clone(),
        ..Default::default()
    };

    for item in &doc.items {
        let Some(link) = item.link.as_deref() else {
            summary.skipped += 1;
            log.debug(format!("↩️ skip (no link) title={:?}", item.title));
            continue;
        };
        let inserted = write_item(store, feed, item, link)
            .instrument(log.span(&AggPhase::WritePost))
            .await?;
        if inserted {
            summary.inserted += 1;
        } else {
            summary.skipped += 1;
        }
    }

    Ok(summary)
}

// Ok(false) when the post already exists.
async fn write_item(
    store: &dyn FeedStore,
    feed: &Feed,
    item: &FeedEntry,
    link: &str,
) -> Result<bool, IngestError> {
    let log = telemetry::agg();

    if store.get_post_by_url(link).await?.is_some() {
        log.debug(format!("↩️ skip (known) url={link}"));
        return Ok(false);
    }

    let raw = item.pub_date.clone().unwrap_or_default();
    let Some((published_at, layout)) = date::normalize_with_layout(&raw) else {
        return Err(IngestError::UnparsableDate { url: link.to_string(), raw });
    };

    let post = NewPost {
        feed_id: feed.id,
        title: item.title.clone(),
        url: link.to_string(),
        description: item.description.clone(),
        published_at,
    };
    match store.create_post(post).await {
        Ok(_) => {
            log.info_kv(
                "➕ insert",
                [
                    ("url", link.to_string()),
                    ("title", item.title.clone()),
                    ("date_layout", layout.to_string()),
                ],
            );
            Ok(true)
        }
        // Lost a race with another writer between lookup and insert.
        Err(StoreError::Duplicate(url)) => {
            log.warn_kv("↩️ skip (duplicate on insert)", [("url", url)]);
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::fetch::StubFetcher;
    use crate::ingestion::types::FeedDocument;
    use crate::store::memory::MemoryStore;
    use chrono::{DateTime, Duration};

    const FEED_URL: &str = "https://x/feed.xml";

    fn entry(title: &str, link: &str, date: &str) -> FeedEntry {
        FeedEntry {
            title: title.into(),
            link: Some(link.into()),
            description: Some(format!("about {title}")),
            pub_date: Some(date.into()),
        }
    }

    fn two_item_doc() -> FeedDocument {
        FeedDocument {
            title: "X".into(),
            items: vec![
                entry("A", "https://x/a", "Mon, 02 Jan 2006 15:04:05 MST"),
                entry("B", "https://x/b", "02 Jan 06 15:04 MST"),
            ],
        }
    }

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[tokio::test]
    async fn first_pass_inserts_and_second_pass_is_a_no_op() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);
        fetcher.serve(FEED_URL, two_item_doc());

        let before = Utc::now();
        let first = ingest_one_feed(&store, &fetcher, &feed).await.unwrap();
        let after = Utc::now();
        assert_eq!(first.inserted, 2);
        assert_eq!(first.skipped, 0);
        assert_eq!(first.channel_title, "X");

        let fetched_at = store.feed(feed.id).unwrap().last_fetched_at.unwrap();
        assert!(fetched_at >= before && fetched_at <= after);

        let posts = store.posts();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "A");
        assert_eq!(posts[0].url, "https://x/a");
        assert_eq!(posts[0].published_at, utc("2006-01-02T22:04:05Z"));
        assert_eq!(posts[1].title, "B");
        assert_eq!(posts[1].url, "https://x/b");
        assert_eq!(posts[1].published_at, utc("2006-01-02T22:04:00Z"));
        assert!(posts.iter().all(|p| p.feed_id == feed.id));

        let feed = store.feed(feed.id).unwrap();
        let second = ingest_one_feed(&store, &fetcher, &feed).await.unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);
        assert_eq!(store.posts().len(), 2);
    }

    #[tokio::test]
    async fn fetch_failure_leaves_timestamp_untouched() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);

        let err = ingest_one_feed(&store, &fetcher, &feed).await.unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::FetchFailed);
        assert_eq!(store.feed(feed.id).unwrap().last_fetched_at, None);
        assert!(store.posts().is_empty());
    }

    #[tokio::test]
    async fn unparsable_date_aborts_after_committing_earlier_items() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);
        fetcher.serve(FEED_URL, FeedDocument {
            title: "X".into(),
            items: vec![
                entry("ok", "https://x/1", "Mon, 02 Jan 2006 15:04:05 +0000"),
                entry("bad", "https://x/2", "sometime last week"),
                entry("later", "https://x/3", "Mon, 02 Jan 2006 15:04:05 +0000"),
            ],
        });

        let err = ingest_one_feed(&store, &fetcher, &feed).await.unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::UnparsableDate);
        assert!(matches!(
            &err,
            IngestError::UnparsableDate { raw, .. } if raw == "sometime last week"
        ));

        let urls: Vec<String> = store.posts().into_iter().map(|p| p.url).collect();
        assert_eq!(urls, vec!["https://x/1".to_string()]);
        // stamped on fetch success, not rolled back
        assert!(store.feed(feed.id).unwrap().last_fetched_at.is_some());
    }

    #[tokio::test]
    async fn wrong_weekday_does_not_block_the_feed() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);
        fetcher.serve(FEED_URL, FeedDocument {
            title: "X".into(),
            items: vec![
                // 2 Jan 2006 was a Monday
                entry("A", "https://x/a", "Tue, 02 Jan 2006 15:04:05 +0000"),
                entry("B", "https://x/b", "Mon, 02 Jan 2006 16:04:05 +0000"),
            ],
        });

        let summary = ingest_one_feed(&store, &fetcher, &feed).await.unwrap();
        assert_eq!(summary.inserted, 2);
        assert_eq!(store.posts()[0].published_at, utc("2006-01-02T15:04:05Z"));
    }

    #[tokio::test]
    async fn missing_date_is_unparsable() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);
        let mut item = entry("A", "https://x/a", "");
        item.pub_date = None;
        fetcher.serve(FEED_URL, FeedDocument { title: "X".into(), items: vec![item] });

        let err = ingest_one_feed(&store, &fetcher, &feed).await.unwrap_err();
        assert_eq!(err.kind(), IngestErrorKind::UnparsableDate);
    }

    #[tokio::test]
    async fn known_urls_skip_date_parsing_and_linkless_items_are_skipped() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let feed = store.add_feed("F", FEED_URL, None);
        store
            .create_post(NewPost {
                feed_id: feed.id,
                title: "old".into(),
                url: "https://x/a".into(),
                description: None,
                published_at: Utc::now(),
            })
            .await
            .unwrap();

        let mut linkless = entry("nolink", "", "Mon, 02 Jan 2006 15:04:05 +0000");
        linkless.link = None;
        fetcher.serve(FEED_URL, FeedDocument {
            title: "X".into(),
            // a known URL with a garbage date must not abort the pass
            items: vec![entry("A", "https://x/a", "garbage"), linkless],
        });

        let summary = ingest_one_feed(&store, &fetcher, &feed).await.unwrap();
        assert_eq!(summary.inserted, 0);
        assert_eq!(summary.skipped, 2);
        assert_eq!(store.posts().len(), 1);
        assert_eq!(store.posts()[0].title, "old");
    }

    #[tokio::test]
    async fn fetch_timestamp_never_moves_backwards() {
        let store = MemoryStore::new();
        let fetcher = StubFetcher::new();
        let earlier = Utc::now() - Duration::hours(1);
        let feed = store.add_feed("F", FEED_URL, Some(earlier));
        fetcher.serve(FEED_URL, FeedDocument::default());

        ingest_one_feed(&store, &fetcher, &feed).await.unwrap();
        let stamped = store.feed(feed.id).unwrap().last_fetched_at.unwrap();
        assert!(stamped >= earlier);
        assert!(stamped <= Utc::now());
    }
}
