use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single product sale, the only persisted entity. Rows are bulk-created
/// by the seeder and read-only afterwards.
///
/// JSON field names are camelCase to match the feed and the frontend
/// contract; `price` is carried as NUMERIC in the store but serialized as a
/// plain JSON number.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: Uuid,
    pub product_title: String,
    pub product_description: String,
    #[serde(with = "decimal_num")]
    pub price: BigDecimal,
    pub date_of_sale: DateTime<Utc>,
    pub sold: bool,
    pub category: String,
    pub image: Option<String>,
}

mod decimal_num {
    use bigdecimal::{BigDecimal, ToPrimitive};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.to_f64().unwrap_or(0.0))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
        let value = f64::deserialize(deserializer)?;
        BigDecimal::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fixture() -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            product_title: "Mechanical Keyboard".to_string(),
            product_description: "Tenkeyless, brown switches".to_string(),
            price: BigDecimal::from_str("329.85").unwrap(),
            date_of_sale: "2022-06-15T10:00:00Z".parse().unwrap(),
            sold: true,
            category: "electronics".to_string(),
            image: None,
        }
    }

    #[test]
    fn test_serializes_camel_case_with_numeric_price() {
        let json = serde_json::to_value(fixture()).unwrap();

        assert_eq!(json["productTitle"], "Mechanical Keyboard");
        assert_eq!(json["productDescription"], "Tenkeyless, brown switches");
        assert_eq!(json["price"], 329.85);
        assert_eq!(json["sold"], true);
        assert_eq!(json["category"], "electronics");
        assert!(json["image"].is_null());
    }

    #[test]
    fn test_deserializes_numeric_price() {
        use bigdecimal::ToPrimitive;

        let parsed: Transaction = serde_json::from_value(serde_json::json!({
            "id": "7f4df5b2-9f9a-4a9c-8a07-6f55dbd2d7b5",
            "productTitle": "Desk Lamp",
            "productDescription": "Adjustable arm",
            "price": 49.5,
            "dateOfSale": "2021-11-27T20:29:54Z",
            "sold": false,
            "category": "home decoration",
            "image": null,
        }))
        .unwrap();

        assert_eq!(parsed.price.to_f64().unwrap(), 49.5);
        assert!(!parsed.sold);
        assert_eq!(parsed.category, "home decoration");
    }
}
