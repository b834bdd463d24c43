use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::db::models::Transaction;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Invalid response from feed: {0}")]
    InvalidResponse(String),
}

/// One raw record as the third-party feed ships it. Every field except the
/// category may be missing or malformed; `normalize` applies the defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedRecord {
    #[serde(default)]
    pub product_title: Option<String>,
    #[serde(default)]
    pub product_description: Option<String>,
    #[serde(default)]
    pub price: Option<Value>,
    #[serde(default)]
    pub date_of_sale: Option<String>,
    #[serde(default)]
    pub sold: Option<Value>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl FeedRecord {
    /// Turns a raw feed record into a persistable row, defaulting every
    /// malformed optional field. Returns `None` when the record carries no
    /// category, which has no safe default.
    pub fn normalize(self, now: DateTime<Utc>) -> Option<Transaction> {
        let category = self.category.filter(|c| !c.trim().is_empty())?;

        Some(Transaction {
            id: Uuid::new_v4(),
            product_title: self
                .product_title
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "Unknown Title".to_string()),
            product_description: self
                .product_description
                .filter(|d| !d.is_empty())
                .unwrap_or_else(|| "No Description".to_string()),
            price: parse_price(self.price.as_ref()),
            date_of_sale: self
                .date_of_sale
                .as_deref()
                .and_then(parse_date)
                .unwrap_or(now),
            sold: self.sold.as_ref().and_then(Value::as_bool).unwrap_or(false),
            category,
            image: self.image.filter(|i| !i.is_empty()),
        })
    }
}

/// Price as shipped: a JSON number, or a numeric string some feed revisions
/// use. Anything else, and anything negative, becomes 0.
fn parse_price(value: Option<&Value>) -> BigDecimal {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64().and_then(|f| BigDecimal::try_from(f).ok()),
        Some(Value::String(s)) => s.trim().parse::<BigDecimal>().ok(),
        _ => None,
    };

    match parsed {
        Some(price) if price >= BigDecimal::from(0) => price,
        _ => BigDecimal::from(0),
    }
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}

/// The feed has shipped both a bare array and an object wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FeedDocument {
    Wrapped { transactions: Vec<FeedRecord> },
    Bare(Vec<FeedRecord>),
}

/// HTTP client for the third-party product-transaction feed.
#[derive(Clone)]
pub struct FeedClient {
    client: Client,
    feed_url: String,
}

impl FeedClient {
    pub fn new(feed_url: String) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_default();

        FeedClient { client, feed_url }
    }

    /// Fetches the raw transaction records from the configured feed URL.
    pub async fn fetch_transactions(&self) -> Result<Vec<FeedRecord>, FeedError> {
        let response = self.client.get(&self.feed_url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::InvalidResponse(format!(
                "feed returned status {}",
                response.status()
            )));
        }

        let document = response.json::<FeedDocument>().await?;
        Ok(match document {
            FeedDocument::Wrapped { transactions } => transactions,
            FeedDocument::Bare(records) => records,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::ToPrimitive;
    use chrono::TimeZone;

    fn ingestion_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_applies_defaults_for_missing_fields() {
        let record: FeedRecord = serde_json::from_value(serde_json::json!({
            "category": "electronics",
        }))
        .unwrap();

        let tx = record.normalize(ingestion_time()).unwrap();

        assert_eq!(tx.product_title, "Unknown Title");
        assert_eq!(tx.product_description, "No Description");
        assert_eq!(tx.price, BigDecimal::from(0));
        assert_eq!(tx.date_of_sale, ingestion_time());
        assert!(!tx.sold);
        assert_eq!(tx.category, "electronics");
        assert!(tx.image.is_none());
    }

    #[test]
    fn test_normalize_keeps_well_formed_fields() {
        let record: FeedRecord = serde_json::from_value(serde_json::json!({
            "productTitle": "Fjallraven Backpack",
            "productDescription": "Fits 15 inch laptops",
            "price": 109.95,
            "dateOfSale": "2021-11-27T20:29:54+05:30",
            "sold": true,
            "category": "men's clothing",
            "image": "https://example.com/backpack.jpg",
        }))
        .unwrap();

        let tx = record.normalize(ingestion_time()).unwrap();

        assert_eq!(tx.product_title, "Fjallraven Backpack");
        assert_eq!(tx.price.to_f64().unwrap(), 109.95);
        assert_eq!(
            tx.date_of_sale,
            Utc.with_ymd_and_hms(2021, 11, 27, 14, 59, 54).unwrap()
        );
        assert!(tx.sold);
        assert_eq!(tx.image.as_deref(), Some("https://example.com/backpack.jpg"));
    }

    #[test]
    fn test_normalize_parses_string_prices_and_rejects_garbage() {
        let priced = |price: Value| {
            let record: FeedRecord = serde_json::from_value(serde_json::json!({
                "price": price,
                "category": "books",
            }))
            .unwrap();
            record.normalize(ingestion_time()).unwrap().price
        };

        assert_eq!(priced(Value::from("129.5")), "129.5".parse().unwrap());
        assert_eq!(priced(Value::from("not a price")), BigDecimal::from(0));
        assert_eq!(priced(Value::from(-42)), BigDecimal::from(0));
        assert_eq!(priced(Value::Bool(true)), BigDecimal::from(0));
    }

    #[test]
    fn test_normalize_treats_non_boolean_sold_as_false() {
        let record: FeedRecord = serde_json::from_value(serde_json::json!({
            "sold": "yes",
            "category": "books",
        }))
        .unwrap();

        assert!(!record.normalize(ingestion_time()).unwrap().sold);
    }

    #[test]
    fn test_normalize_drops_records_without_category() {
        let missing: FeedRecord = serde_json::from_value(serde_json::json!({
            "productTitle": "Uncategorized",
        }))
        .unwrap();
        let blank: FeedRecord = serde_json::from_value(serde_json::json!({
            "category": "   ",
        }))
        .unwrap();

        assert!(missing.normalize(ingestion_time()).is_none());
        assert!(blank.normalize(ingestion_time()).is_none());
    }

    #[tokio::test]
    async fn test_fetch_accepts_a_bare_array() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/feed.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"productTitle": "Lamp", "price": 49.5, "category": "home"}]"#)
            .create_async()
            .await;

        let client = FeedClient::new(format!("{}/feed.json", server.url()));
        let records = client.fetch_transactions().await.unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product_title.as_deref(), Some("Lamp"));
    }

    #[tokio::test]
    async fn test_fetch_accepts_a_wrapped_object() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/feed.json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"transactions": [{"category": "home"}, {"category": "books"}]}"#)
            .create_async()
            .await;

        let client = FeedClient::new(format!("{}/feed.json", server.url()));
        let records = client.fetch_transactions().await.unwrap();

        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_fetch_surfaces_upstream_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/feed.json")
            .with_status(503)
            .create_async()
            .await;

        let client = FeedClient::new(format!("{}/feed.json", server.url()));
        let result = client.fetch_transactions().await;

        assert!(matches!(result, Err(FeedError::InvalidResponse(_))));
    }
}
