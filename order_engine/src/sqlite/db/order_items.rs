use sqlx::{QueryBuilder, SqliteConnection};

use crate::db_types::{OrderId, OrderItem};

/// Inserts all the line items for an order in one statement. Run this in the same transaction as the order insert.
pub async fn insert_items(
    order_id: &OrderId,
    items: &[OrderItem],
    conn: &mut SqliteConnection,
) -> Result<u64, sqlx::Error> {
    if items.is_empty() {
        return Ok(0);
    }
    let mut builder = QueryBuilder::new("INSERT INTO order_items (order_id, product_id, quantity, price) ");
    builder.push_values(items, |mut row, item| {
        row.push_bind(order_id.as_str())
            .push_bind(item.product_id)
            .push_bind(item.quantity)
            .push_bind(item.price.value());
    });
    let result = builder.build().execute(conn).await?;
    Ok(result.rows_affected())
}

/// Fetches the stored line items of the order, in the order they were placed.
pub async fn fetch_items(order_id: &OrderId, conn: &mut SqliteConnection) -> Result<Vec<OrderItem>, sqlx::Error> {
    let items = sqlx::query_as("SELECT product_id, quantity, price FROM order_items WHERE order_id = $1 ORDER BY id")
        .bind(order_id.as_str())
        .fetch_all(conn)
        .await?;
    Ok(items)
}
