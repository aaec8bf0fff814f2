//! MySQL store backend
//!
//! Backed by a bounded connection pool. Each statement checks a connection
//! out for its own duration only; arguments are always bound.

use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;

use crate::types::{LineItem, NewLineItem, NewOrder, Product};
use crate::Result;

use super::Store;

// Numeric and key columns are cast so rows decode whatever the column types
// of an existing database are (INT or DECIMAL prices, INT order ids).
const LIST_PRODUCTS: &str =
    "SELECT name, image_url, CAST(price AS DOUBLE) AS price FROM products";

const SEARCH_PRODUCTS: &str = "SELECT name, image_url, CAST(price AS DOUBLE) AS price \
     FROM products WHERE name COLLATE utf8mb4_bin LIKE ?";

const ORDER_LINE_ITEMS: &str = "SELECT CAST(order_id AS CHAR) AS order_id, name, \
     CAST(price AS DOUBLE) AS price, CAST(count AS SIGNED) AS count, img_url \
     FROM select_product WHERE CAST(order_id AS CHAR) COLLATE utf8mb4_bin = ?";

const INSERT_LINE_ITEM: &str =
    "INSERT INTO select_product (name, price, count, order_id, img_url) VALUES (?, ?, ?, ?, ?)";

const INSERT_ORDER: &str = "INSERT INTO `order` (name, price, count, address) VALUES (?, ?, ?, ?)";

/// Pool sizing for [`MySqlStore::connect`]
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            acquire_timeout: Duration::from_secs(5),
        }
    }
}

/// Store backed by a MySQL connection pool
#[derive(Clone)]
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    /// Open a pool and establish the first connection eagerly so that bad
    /// credentials fail at startup.
    pub async fn connect(options: MySqlConnectOptions, settings: PoolSettings) -> Result<Self> {
        let pool = MySqlPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(settings.acquire_timeout)
            .connect_with(options)
            .await?;

        tracing::info!(
            max_connections = settings.max_connections,
            "MySQL pool connected"
        );

        Ok(Self { pool })
    }

    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for MySqlStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(LIST_PRODUCTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn search_products(&self, category: &str) -> Result<Vec<Product>> {
        let rows = sqlx::query_as::<_, Product>(SEARCH_PRODUCTS)
            .bind(format!("%{}%", category))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn order_line_items(&self, order_id: &str) -> Result<Vec<LineItem>> {
        let rows = sqlx::query_as::<_, LineItem>(ORDER_LINE_ITEMS)
            .bind(order_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn insert_line_item(&self, item: &NewLineItem) -> Result<()> {
        sqlx::query(INSERT_LINE_ITEM)
            .bind(&item.name)
            .bind(item.price)
            .bind(item.count)
            .bind(item.order_id.to_string())
            .bind(&item.img_url)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<u64> {
        let result = sqlx::query(INSERT_ORDER)
            .bind(order.names_json()?)
            .bind(order.total_price)
            .bind(order.total_count)
            .bind(&order.address)
            .execute(&self.pool)
            .await?;
        Ok(result.last_insert_id())
    }

    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_bind_every_argument() {
        assert_eq!(SEARCH_PRODUCTS.matches('?').count(), 1);
        assert_eq!(ORDER_LINE_ITEMS.matches('?').count(), 1);
        assert_eq!(INSERT_LINE_ITEM.matches('?').count(), 5);
        assert_eq!(INSERT_ORDER.matches('?').count(), 4);
    }

    #[test]
    fn test_reads_cast_columns_and_compare_binary() {
        for sql in [LIST_PRODUCTS, SEARCH_PRODUCTS, ORDER_LINE_ITEMS] {
            assert!(sql.contains("CAST(price AS DOUBLE) AS price"), "{}", sql);
        }
        assert!(ORDER_LINE_ITEMS.contains("CAST(order_id AS CHAR) AS order_id"));
        assert!(ORDER_LINE_ITEMS.contains("CAST(count AS SIGNED) AS count"));
        assert!(SEARCH_PRODUCTS.contains("COLLATE utf8mb4_bin LIKE ?"));
        assert!(ORDER_LINE_ITEMS.contains("COLLATE utf8mb4_bin = ?"));
    }

    #[test]
    fn test_order_table_is_quoted() {
        assert!(INSERT_ORDER.contains("`order`"));
    }

    #[tokio::test]
    async fn test_close_lazy_pool() {
        let options = MySqlConnectOptions::new()
            .host("127.0.0.1")
            .database("shop");
        let pool = MySqlPoolOptions::new().connect_lazy_with(options);
        let store = MySqlStore::from_pool(pool);

        store.close().await.unwrap();
        assert!(store.pool.is_closed());
    }
}
