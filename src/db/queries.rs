use bigdecimal::BigDecimal;
use sqlx::{PgPool, Result};

use crate::db::models::Transaction;

/// Drops the whole collection and re-inserts the given rows inside one
/// database transaction, so concurrent readers observe either the old or
/// the new contents, never a partial replace.
pub async fn replace_all_transactions(pool: &PgPool, transactions: &[Transaction]) -> Result<u64> {
    let mut db_tx = pool.begin().await?;

    sqlx::query("DELETE FROM transactions")
        .execute(&mut *db_tx)
        .await?;

    for t in transactions {
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, product_title, product_description, price, date_of_sale, sold, category, image
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(t.id)
        .bind(&t.product_title)
        .bind(&t.product_description)
        .bind(&t.price)
        .bind(t.date_of_sale)
        .bind(t.sold)
        .bind(&t.category)
        .bind(&t.image)
        .execute(&mut *db_tx)
        .await?;
    }

    db_tx.commit().await?;
    Ok(transactions.len() as u64)
}

/// Paginated search over title and description (case-insensitive substring),
/// plus exact price equality when the term parses as a number. An empty term
/// matches every row. Returns the total match count alongside the page.
pub async fn search_transactions(
    pool: &PgPool,
    search: &str,
    page: i64,
    per_page: i64,
) -> Result<(i64, Vec<Transaction>)> {
    let pattern = format!("%{}%", search);
    let price_term: Option<BigDecimal> = {
        let trimmed = search.trim();
        if trimmed.is_empty() {
            None
        } else {
            trimmed.parse::<BigDecimal>().ok()
        }
    };
    let offset = (page - 1) * per_page;

    let total: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM transactions
        WHERE product_title ILIKE $1 OR product_description ILIKE $1 OR price = $2
        "#,
    )
    .bind(&pattern)
    .bind(&price_term)
    .fetch_one(pool)
    .await?;

    let transactions = sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE product_title ILIKE $1 OR product_description ILIKE $1 OR price = $2
        ORDER BY date_of_sale, id
        LIMIT $3 OFFSET $4
        "#,
    )
    .bind(&pattern)
    .bind(&price_term)
    .bind(per_page)
    .bind(offset)
    .fetch_all(pool)
    .await?;

    Ok((total, transactions))
}

/// All rows whose sale date falls in the given calendar month (0 = January),
/// across every year. Month components are taken in UTC, matching how rows
/// are stored.
pub async fn transactions_in_month(pool: &PgPool, month_index: u32) -> Result<Vec<Transaction>> {
    sqlx::query_as::<_, Transaction>(
        r#"
        SELECT * FROM transactions
        WHERE EXTRACT(MONTH FROM date_of_sale AT TIME ZONE 'UTC')::int = $1
        "#,
    )
    .bind(month_index as i32 + 1)
    .fetch_all(pool)
    .await
}
