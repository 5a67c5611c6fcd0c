//! `SqliteDatabase` is the SQLite implementation of the order engine storage backend.
//!
//! It implements [`OrderManagement`] on top of the low-level functions in [`super::db`].
use std::fmt::Debug;

use chrono::Utc;
use log::*;
use sqlx::{migrate::MigrateError, SqlitePool};

use super::db::{db_url, new_pool, order_items, orders, receipts};
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderReceipt, OrderStatusType, OrderWithItems},
    oms_api::order_objects::{OrderQueryFilter, Pagination},
    traits::{OrderManagement, OrderStoreError, SettlementResult},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new database API object using the URL in `OMS_DATABASE_URL`.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Safe to call on every start-up.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        sqlx::migrate!("./src/sqlite/migrations").run(&self.pool).await?;
        info!("🗃️ Database migrations complete");
        Ok(())
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Closes the pool, waiting for checked-out connections to be returned.
    pub async fn close(&self) {
        self.pool.close().await;
        debug!("🗃️ Database connection pool closed");
    }
}

impl OrderManagement for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<OrderWithItems, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let saved = match orders::insert_order(&order, &mut tx).await {
            Ok(saved) => saved,
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                return Err(OrderStoreError::OrderAlreadyExists(order.id));
            },
            Err(e) => return Err(e.into()),
        };
        let count = order_items::insert_items(&saved.id, &order.items, &mut tx).await?;
        let items = order_items::fetch_items(&saved.id, &mut tx).await?;
        tx.commit().await?;
        debug!("🗃️ Order [{}] saved with {count} line items. Total: {}", saved.id, saved.total_amount);
        Ok(OrderWithItems { order: saved, items })
    }

    async fn fetch_order(&self, id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_with_items(&self, id: &OrderId) -> Result<Option<OrderWithItems>, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let result = match orders::fetch_order(id, &mut tx).await? {
            Some(order) => {
                let items = order_items::fetch_items(id, &mut tx).await?;
                Some(OrderWithItems { order, items })
            },
            None => None,
        };
        tx.commit().await?;
        Ok(result)
    }

    async fn search_orders(
        &self,
        filter: &OrderQueryFilter,
        pagination: &Pagination,
    ) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::search_orders(filter, pagination, &mut conn).await?;
        Ok(orders)
    }

    async fn count_orders(&self, filter: &OrderQueryFilter) -> Result<i64, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let count = orders::count_orders(filter, &mut conn).await?;
        Ok(count)
    }

    async fn update_order_status(&self, id: &OrderId, status: OrderStatusType) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::update_order_status(id, status, &mut conn).await?;
        order.ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))
    }

    async fn settle_order(
        &self,
        id: &OrderId,
        charge_id: &str,
        receipt_url: &str,
    ) -> Result<SettlementResult, OrderStoreError> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;
        // The conditional update takes the write lock first, so concurrent settlements queue up behind it
        let (order, newly_settled) = match orders::mark_order_paid(id, charge_id, now, &mut tx).await? {
            Some(order) => (order, true),
            None => {
                let order = orders::fetch_order(id, &mut tx)
                    .await?
                    .ok_or_else(|| OrderStoreError::OrderNotFound(id.clone()))?;
                (order, false)
            },
        };
        let receipt_created = receipts::insert_receipt_if_missing(id, receipt_url, now, &mut tx).await?;
        if receipt_created && !newly_settled {
            warn!("🗃️ Order [{id}] was already paid but had no receipt. A receipt has been attached.");
        }
        let receipt = receipts::fetch_receipt(id, &mut tx).await?.ok_or_else(|| {
            error!("🗃️ The receipt for order [{id}] vanished inside a transaction. This is a bug.");
            OrderStoreError::DatabaseError(format!("Receipt for order {id} could not be read back"))
        })?;
        tx.commit().await?;
        if newly_settled {
            debug!("🗃️ Order [{id}] marked as paid. Receipt #{} issued.", receipt.id);
        } else {
            debug!("🗃️ Order [{id}] was already settled. Nothing changed.");
        }
        Ok(SettlementResult { order, receipt, newly_settled })
    }

    async fn fetch_receipt(&self, id: &OrderId) -> Result<Option<OrderReceipt>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let receipt = receipts::fetch_receipt(id, &mut conn).await?;
        Ok(receipt)
    }
}
