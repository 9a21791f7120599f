use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use tokio_util::sync::CancellationToken;

use crate::ingestion::fetch::{HttpFetcher, DEFAULT_TIMEOUT_SECS};
use crate::scheduler;
use crate::session::Session;
use crate::store::PgStore;
use crate::telemetry::{self};
use crate::util::time::parse_interval;

/// gator agg <interval>
#[derive(Args, Debug)]
pub struct AggCmd {
    /// Time between passes, e.g. 30s, 1m, 1h30m
    #[arg(value_parser = parse_interval)]
    pub interval: Duration,
    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}

/// Runs until Ctrl-C.
pub async fn run(session: &Session, args: AggCmd) -> Result<()> {
    let log = telemetry::agg();
    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs)).context("failed to build HTTP client")?;
    let store = PgStore::new(session.pool().clone());

    let shutdown = CancellationToken::new();
    let on_signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    log.info(format!("🐊 Aggregating (timeout={}s); press Ctrl-C to stop", args.timeout_secs));
    scheduler::run(Arc::new(store), Arc::new(fetcher), args.interval, shutdown).await;
    Ok(())
}
