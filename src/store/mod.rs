//! Store abstraction layer
//!
//! Every handler issues exactly one statement through this trait. The MySQL
//! backend is used in production; the in-memory backend serves tests and
//! local development.

use async_trait::async_trait;

use crate::types::{LineItem, NewLineItem, NewOrder, Product};
use crate::Result;

pub mod memory;
pub mod mysql;

pub use memory::MemoryStore;
pub use mysql::MySqlStore;

/// Relational store backing the catalog and order tables
#[async_trait]
pub trait Store: Send + Sync {
    /// All catalog rows, in store order
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Catalog rows whose name contains `category` (case-sensitive)
    async fn search_products(&self, category: &str) -> Result<Vec<Product>>;

    /// Line items recorded under `order_id`
    async fn order_line_items(&self, order_id: &str) -> Result<Vec<LineItem>>;

    /// Insert one line item into `select_product`
    async fn insert_line_item(&self, item: &NewLineItem) -> Result<()>;

    /// Insert one order row, returning the store-assigned id
    async fn insert_order(&self, order: &NewOrder) -> Result<u64>;

    /// Round-trip check used by the health endpoint
    async fn ping(&self) -> Result<()>;

    /// Release the underlying connections
    async fn close(&self) -> Result<()>;
}
