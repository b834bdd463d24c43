//! Month-scoped reporting over the transactions collection.
//!
//! Each report is a pure function over the month's rows; the async
//! wrappers only validate the month name and fetch the rows. A month is
//! matched by its calendar-month component alone, so every January across
//! all years lands in the same report.

use bigdecimal::{BigDecimal, ToPrimitive};
use serde::Serialize;
use sqlx::PgPool;
use std::collections::HashMap;

use crate::db::models::Transaction;
use crate::db::queries;
use crate::error::AppError;

/// Canonical English month names, the only accepted report inputs.
/// Lookup is case-sensitive: "january" and "Jan" are rejected.
pub const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Zero-based month number for a canonical month name.
pub fn month_index(name: &str) -> Option<u32> {
    MONTHS.iter().position(|m| *m == name).map(|i| i as u32)
}

pub const BUCKET_LABELS: [&str; 10] = [
    "0-100",
    "101-200",
    "201-300",
    "301-400",
    "401-500",
    "501-600",
    "601-700",
    "701-800",
    "801-900",
    "901-above",
];

const BUCKET_UPPER_BOUNDS: [i64; 9] = [100, 200, 300, 400, 500, 600, 700, 800, 900];

#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_sale_amount: f64,
    pub total_sold_items: i64,
    pub total_not_sold_items: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct RangeCount {
    pub range: &'static str,
    pub count: i64,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    pub statistics: Statistics,
    pub bar_chart: Vec<RangeCount>,
    pub pie_chart: Vec<CategoryCount>,
}

/// Summary totals for one month's rows. The sale amount sums every record
/// regardless of the sold flag; only the item counts split on it.
pub fn summarize(transactions: &[Transaction]) -> Statistics {
    let mut total_amount = BigDecimal::from(0);
    let mut sold_items = 0i64;
    let mut not_sold_items = 0i64;

    for t in transactions {
        total_amount += &t.price;
        if t.sold {
            sold_items += 1;
        } else {
            not_sold_items += 1;
        }
    }

    Statistics {
        total_sale_amount: total_amount.to_f64().unwrap_or(0.0),
        total_sold_items: sold_items,
        total_not_sold_items: not_sold_items,
    }
}

/// Bucket for a price: first bucket whose upper bound the price does not
/// exceed, falling through to the open-ended top bucket. Upper bounds are
/// inclusive, so 100 lands in "0-100" and 101 in "101-200".
fn bucket_index(price: &BigDecimal) -> usize {
    BUCKET_UPPER_BOUNDS
        .iter()
        .position(|upper| price <= &BigDecimal::from(*upper))
        .unwrap_or(BUCKET_LABELS.len() - 1)
}

/// Fixed ten-bucket price histogram. Every bucket is present in ascending
/// range order, empty ones with a zero count; the list is never sparse.
pub fn price_histogram(transactions: &[Transaction]) -> Vec<RangeCount> {
    let mut counts = [0i64; BUCKET_LABELS.len()];
    for t in transactions {
        counts[bucket_index(&t.price)] += 1;
    }

    BUCKET_LABELS
        .iter()
        .copied()
        .zip(counts)
        .map(|(range, count)| RangeCount { range, count })
        .collect()
}

/// Per-category counts over one month's rows. Categories are grouped by
/// exact value and only categories actually present appear; the output
/// order is unspecified.
pub fn category_breakdown(transactions: &[Transaction]) -> Vec<CategoryCount> {
    let mut counts: HashMap<&str, i64> = HashMap::new();
    for t in transactions {
        *counts.entry(t.category.as_str()).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(category, count)| CategoryCount {
            category: category.to_string(),
            count,
        })
        .collect()
}

pub async fn statistics_for_month(pool: &PgPool, month: &str) -> Result<Statistics, AppError> {
    let index = month_index(month).ok_or(AppError::InvalidMonth)?;
    let rows = queries::transactions_in_month(pool, index).await?;
    Ok(summarize(&rows))
}

pub async fn bar_chart_for_month(pool: &PgPool, month: &str) -> Result<Vec<RangeCount>, AppError> {
    let index = month_index(month).ok_or(AppError::InvalidMonth)?;
    let rows = queries::transactions_in_month(pool, index).await?;
    Ok(price_histogram(&rows))
}

pub async fn pie_chart_for_month(
    pool: &PgPool,
    month: &str,
) -> Result<Vec<CategoryCount>, AppError> {
    let index = month_index(month).ok_or(AppError::InvalidMonth)?;
    let rows = queries::transactions_in_month(pool, index).await?;
    Ok(category_breakdown(&rows))
}

/// All three reports in one object. The sections are computed
/// independently, each against its own store read, so a reseed racing this
/// request may be visible in some sections and not in others. The first
/// failing section aborts the whole report.
pub async fn combined_for_month(pool: &PgPool, month: &str) -> Result<CombinedReport, AppError> {
    let statistics = statistics_for_month(pool, month).await?;
    let bar_chart = bar_chart_for_month(pool, month).await?;
    let pie_chart = pie_chart_for_month(pool, month).await?;

    Ok(CombinedReport {
        statistics,
        bar_chart,
        pie_chart,
    })
}
