use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::ingestion::fetch::FeedFetcher;
use crate::ingestion::types::IngestSummary;
use crate::ingestion::{self, IngestError};
use crate::store::{FeedStore, StoreError};
use crate::telemetry::{self};
use crate::telemetry::ops::agg::Phase as AggPhase;

/// Polls one feed per tick until `shutdown` fires.
///
/// The first pass runs immediately. A pass that overruns the interval is
/// followed straight away by the next one; missed ticks are not replayed.
/// Pass failures are logged and never end the loop.
pub async fn run(
    store: Arc<dyn FeedStore>,
    fetcher: Arc<dyn FeedFetcher>,
    interval: Duration,
    shutdown: CancellationToken,
) {
    let log = telemetry::agg();
    log.info(format!("⏱️ Collecting feeds every {:?}", interval));

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut tick: u64 = 0;

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = ticker.tick() => {}
        }
        tick += 1;

        let pass = scrape_once(store.as_ref(), fetcher.as_ref())
            .instrument(log.span_kv(&AggPhase::Tick, [("tick", tick.to_string())]));
        let outcome = tokio::select! {
            _ = shutdown.cancelled() => break,
            res = pass => res,
        };

        match outcome {
            Ok(summary) => log.pass_summary(&summary.feed_url, summary.inserted, summary.skipped),
            Err(IngestError::Store(StoreError::NotFound(_))) => log.info("💤 No feeds to fetch yet"),
            Err(e) => log.pass_failed(e.kind().as_str(), &e),
        }
    }

    log.info("🛑 Aggregation stopped");
}

/// One scheduler pass: pick the most stale feed and ingest it.
pub async fn scrape_once(store: &dyn FeedStore, fetcher: &dyn FeedFetcher) -> Result<IngestSummary, IngestError> {
    let log = telemetry::agg();
    let feed = store
        .next_feed_to_fetch()
        .instrument(log.span(&AggPhase::SelectFeed))
        .await?;
    ingestion::ingest_one_feed(store, fetcher, &feed).await
}
