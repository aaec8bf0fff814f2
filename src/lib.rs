//! Storefront - a small e-commerce backend
//!
//! Storefront exposes:
//! - Product catalog listing and name search
//! - Cart line items keyed by a caller-supplied order id
//! - Order placement with aggregate totals
//!
//! Every request runs exactly one parameterized statement against MySQL
//! through a bounded connection pool.

pub mod api;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod store;
pub mod types;

pub use error::{Error, Result};
