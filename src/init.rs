use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::telemetry::{self};
use crate::telemetry::ops::init::Phase as InitPhase;

pub async fn connect(dsn: &str) -> Result<PgPool> {
    let log = telemetry::init();
    let _s = log.span(&InitPhase::Connect).entered();
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(dsn)
        .await
        .context("failed to connect to database")?;
    Ok(pool)
}

/// gator init
pub async fn run(pool: &PgPool) -> Result<()> {
    let log = telemetry::init();
    let _g = log.root_span().entered();
    let _s = log.span(&InitPhase::Migrate).entered();

    // Apply any pending migrations (idempotent)
    sqlx::migrate!().run(pool).await.context("failed to run migrations")?;
    log.info("✅ Database initialized");
    Ok(())
}
