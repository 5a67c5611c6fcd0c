use chrono::{DateTime, Utc};
use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType},
    oms_api::order_objects::{OrderQueryFilter, Pagination},
};

/// Inserts the order header. This is not atomic on its own: callers that also write the line items should run both
/// inside one transaction and pass `&mut tx` as the connection argument.
pub async fn insert_order(order: &NewOrder, conn: &mut SqliteConnection) -> Result<Order, sqlx::Error> {
    let order: Order = sqlx::query_as(
        r#"
            INSERT INTO orders (
                id,
                total_amount,
                total_items,
                status,
                paid,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, 0, $5, $5)
            RETURNING *;
        "#,
    )
    .bind(order.id.as_str())
    .bind(order.total_amount.value())
    .bind(order.total_items)
    .bind(OrderStatusType::Pending.to_string())
    .bind(order.created_at)
    .fetch_one(conn)
    .await?;
    debug!("🗃️ Order [{}] inserted", order.id);
    Ok(order)
}

pub async fn fetch_order(id: &OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

fn push_filter(builder: &mut QueryBuilder<'_, Sqlite>, filter: &OrderQueryFilter) {
    if filter.is_empty() {
        return;
    }
    builder.push(" WHERE ");
    let mut where_clause = builder.separated(" AND ");
    if let Some(status) = &filter.status {
        where_clause.push("status = ");
        where_clause.push_bind_unseparated(status.as_str());
    }
}

/// Fetches one page of orders matching the filter.
///
/// Orders are sorted by `created_at` in ascending order. Orders created in the same instant keep their insertion order.
pub async fn search_orders(
    filter: &OrderQueryFilter,
    pagination: &Pagination,
    conn: &mut SqliteConnection,
) -> Result<Vec<Order>, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT * FROM orders");
    push_filter(&mut builder, filter);
    builder.push(" ORDER BY created_at ASC, rowid ASC LIMIT ");
    builder.push_bind(pagination.limit());
    builder.push(" OFFSET ");
    builder.push_bind(pagination.offset());
    trace!("🗃️ Executing query: {}", builder.sql());
    let orders = builder.build_query_as::<Order>().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {}", orders.len());
    Ok(orders)
}

pub async fn count_orders(filter: &OrderQueryFilter, conn: &mut SqliteConnection) -> Result<i64, sqlx::Error> {
    let mut builder = QueryBuilder::new("SELECT COUNT(*) FROM orders");
    push_filter(&mut builder, filter);
    let (count,) = builder.build_query_as::<(i64,)>().fetch_one(conn).await?;
    Ok(count)
}

/// Overwrites the order status. Returns `None` if the order does not exist.
pub async fn update_order_status(
    id: &OrderId,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("UPDATE orders SET status = $1, updated_at = $2 WHERE id = $3 RETURNING *")
        .bind(status.to_string())
        .bind(Utc::now())
        .bind(id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(order)
}

/// Marks an unpaid order as paid. The update only applies if the order exists and has not been paid yet, so at most
/// one caller ever sees `Some` for a given order.
pub async fn mark_order_paid(
    id: &OrderId,
    charge_id: &str,
    paid_at: DateTime<Utc>,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as(
        r#"
            UPDATE orders SET
                paid = 1,
                paid_at = $1,
                stripe_charge_id = $2,
                status = $3,
                updated_at = $1
            WHERE id = $4 AND paid = 0
            RETURNING *;
        "#,
    )
    .bind(paid_at)
    .bind(charge_id)
    .bind(OrderStatusType::Paid.to_string())
    .bind(id.as_str())
    .fetch_optional(conn)
    .await?;
    Ok(order)
}
