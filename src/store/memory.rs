//! In-memory store backend
//!
//! Mirrors the MySQL statements over plain vectors. Rows come back in
//! insertion order and order ids are assigned from 1 upwards. Comparisons
//! follow the binary collation the MySQL statements use: category search is
//! a case-sensitive `LIKE '%category%'`, order ids match exactly.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::types::{LineItem, NewLineItem, NewOrder, Product};
use crate::{Error, Result};

use super::Store;

/// Order row as the `order` table would hold it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredOrder {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub count: i64,
    pub address: String,
}

#[derive(Default)]
struct Tables {
    products: Vec<Product>,
    line_items: Vec<LineItem>,
    orders: Vec<StoredOrder>,
}

/// Store held entirely in process memory
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
    closed: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with catalog rows
    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                products,
                ..Tables::default()
            }),
            ..Self::default()
        }
    }

    /// Make every subsequent statement fail (or succeed again)
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Snapshot of the `order` table
    pub async fn orders(&self) -> Vec<StoredOrder> {
        self.tables.read().await.orders.clone()
    }

    /// Snapshot of the `select_product` table
    pub async fn line_items(&self) -> Vec<LineItem> {
        self.tables.read().await.line_items.clone()
    }

    fn check(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(Error::store("store is closed"));
        }
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(Error::store("store is unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.check()?;
        Ok(self.tables.read().await.products.clone())
    }

    async fn search_products(&self, category: &str) -> Result<Vec<Product>> {
        self.check()?;
        let pattern = format!("%{}%", category);
        let tables = self.tables.read().await;
        Ok(tables
            .products
            .iter()
            .filter(|p| like_matches(&pattern, &p.name))
            .cloned()
            .collect())
    }

    async fn order_line_items(&self, order_id: &str) -> Result<Vec<LineItem>> {
        self.check()?;
        let tables = self.tables.read().await;
        Ok(tables
            .line_items
            .iter()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn insert_line_item(&self, item: &NewLineItem) -> Result<()> {
        self.check()?;
        self.tables.write().await.line_items.push(LineItem {
            order_id: item.order_id.to_string(),
            name: item.name.clone(),
            price: item.price,
            count: item.count,
            img_url: item.img_url.clone(),
        });
        Ok(())
    }

    async fn insert_order(&self, order: &NewOrder) -> Result<u64> {
        self.check()?;
        let name = order.names_json()?;
        let mut tables = self.tables.write().await;
        let id = tables.orders.len() as u64 + 1;
        tables.orders.push(StoredOrder {
            id,
            name,
            price: order.total_price,
            count: order.total_count,
            address: order.address.clone(),
        });
        Ok(id)
    }

    async fn ping(&self) -> Result<()> {
        self.check()
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(Error::store("store already closed"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LikeToken {
    Any,
    One,
    Char(char),
}

fn like_tokens(pattern: &str) -> Vec<LikeToken> {
    let mut tokens = Vec::new();
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        tokens.push(match c {
            '%' => LikeToken::Any,
            '_' => LikeToken::One,
            '\\' => LikeToken::Char(chars.next().unwrap_or('\\')),
            other => LikeToken::Char(other),
        });
    }
    tokens
}

/// `text LIKE pattern` under a binary collation: `%` matches any run of
/// characters, `_` exactly one, `\` escapes the next character.
pub fn like_matches(pattern: &str, text: &str) -> bool {
    let pattern = like_tokens(pattern);
    let text: Vec<char> = text.chars().collect();

    let (mut p, mut t) = (0, 0);
    // Last `%` seen and the text position it is currently absorbing up to
    let mut backtrack: Option<(usize, usize)> = None;

    while t < text.len() {
        match pattern.get(p) {
            Some(LikeToken::Any) => {
                backtrack = Some((p, t));
                p += 1;
            }
            Some(LikeToken::One) => {
                p += 1;
                t += 1;
            }
            Some(LikeToken::Char(c)) if *c == text[t] => {
                p += 1;
                t += 1;
            }
            _ => match backtrack {
                Some((any_p, any_t)) => {
                    p = any_p + 1;
                    t = any_t + 1;
                    backtrack = Some((any_p, any_t + 1));
                }
                None => return false,
            },
        }
    }

    pattern[p..].iter().all(|tok| *tok == LikeToken::Any)
}
