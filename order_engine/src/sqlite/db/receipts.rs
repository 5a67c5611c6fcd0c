use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;

use crate::db_types::{OrderId, OrderReceipt};

/// Attaches a receipt to the order unless it already has one. Returns true if a new receipt was written.
pub async fn insert_receipt_if_missing(
    order_id: &OrderId,
    receipt_url: &str,
    created_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO order_receipts (order_id, receipt_url, created_at) VALUES ($1, $2, $3) ON CONFLICT (order_id) DO \
         NOTHING",
    )
    .bind(order_id.as_str())
    .bind(receipt_url)
    .bind(created_at)
    .execute(conn)
    .await?;
    Ok(result.rows_affected() == 1)
}

pub async fn fetch_receipt(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<OrderReceipt>, sqlx::Error> {
    let receipt = sqlx::query_as("SELECT * FROM order_receipts WHERE order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(receipt)
}
