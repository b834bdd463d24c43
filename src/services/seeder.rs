use chrono::Utc;
use sqlx::PgPool;
use thiserror::Error;

use crate::db::models::Transaction;
use crate::db::queries;
use crate::feed::{FeedClient, FeedError};

#[derive(Error, Debug)]
pub enum SeedError {
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// One-shot seed job: fetch the remote feed, normalize every record, and
/// replace the whole transactions collection with the result.
///
/// Records without a category are skipped; every other malformed field is
/// defaulted rather than rejected. Returns the number of rows inserted.
pub async fn run_seed(pool: &PgPool, feed: &FeedClient) -> Result<u64, SeedError> {
    let records = feed.fetch_transactions().await?;
    let fetched = records.len();
    tracing::info!("fetched {} records from feed", fetched);

    let now = Utc::now();
    let transactions: Vec<Transaction> = records
        .into_iter()
        .filter_map(|record| record.normalize(now))
        .collect();

    let skipped = fetched - transactions.len();
    if skipped > 0 {
        tracing::warn!("skipped {} feed records without a category", skipped);
    }

    let inserted = queries::replace_all_transactions(pool, &transactions).await?;
    tracing::info!("seeded {} transactions", inserted);

    Ok(inserted)
}
