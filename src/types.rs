//! Core data types for storefront

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

/// Catalog row as listed by `GET /products`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub name: String,
    pub image_url: String,
    pub price: f64,
}

/// Cart line item row from `select_product`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LineItem {
    pub order_id: String,
    pub name: String,
    pub price: f64,
    pub count: i64,
    pub img_url: String,
}

/// Caller-supplied order reference.
///
/// Clients send either a string or an integer; both are stored as text and
/// echoed back in the shape they arrived in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderKey {
    Number(i64),
    Text(String),
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Number(n) => write!(f, "{}", n),
            OrderKey::Text(s) => f.write_str(s),
        }
    }
}

/// Body of `POST /select_product`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddLineItemRequest {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub count: Option<i64>,
    pub order_id: Option<OrderKey>,
    pub img_url: Option<String>,
}

impl AddLineItemRequest {
    /// Check that every field is present. Zero prices and counts are valid.
    pub fn validate(self) -> Result<NewLineItem> {
        let order_id = match self.order_id {
            Some(OrderKey::Text(s)) if s.trim().is_empty() => None,
            other => other,
        };

        Ok(NewLineItem {
            name: required_text("name", self.name)?,
            price: required("price", self.price)?,
            count: required("count", self.count)?,
            order_id: required("order_id", order_id)?,
            img_url: required_text("img_url", self.img_url)?,
        })
    }
}

/// Validated line item ready for insertion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLineItem {
    pub name: String,
    pub price: f64,
    pub count: i64,
    pub order_id: OrderKey,
    pub img_url: String,
}

/// Body of `POST /order`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaceOrderRequest {
    pub names: Option<Vec<String>>,
    pub prices: Option<Vec<f64>>,
    pub counts: Option<Vec<i64>>,
    pub address: Option<String>,
}

impl PlaceOrderRequest {
    /// Check presence of every field and that the three sequences line up,
    /// then compute the aggregate totals.
    pub fn validate(self) -> Result<NewOrder> {
        let names = required("names", self.names)?;
        let prices = required("prices", self.prices)?;
        let counts = required("counts", self.counts)?;
        let address = required_text("address", self.address)?;

        if names.is_empty() {
            return Err(Error::validation("names must contain at least one product"));
        }

        if prices.len() != names.len() || counts.len() != names.len() {
            return Err(Error::validation(format!(
                "names, prices and counts must have the same length (got {}, {}, {})",
                names.len(),
                prices.len(),
                counts.len()
            )));
        }

        let total_price = prices.iter().sum::<f64>();
        let total_count = counts
            .iter()
            .try_fold(0i64, |acc, c| acc.checked_add(*c))
            .ok_or_else(|| Error::validation("counts total is out of range"))?;

        Ok(NewOrder {
            names,
            total_price,
            total_count,
            address,
        })
    }
}

/// Aggregated order ready for insertion; also the `orderDetails` payload
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub names: Vec<String>,
    pub total_price: f64,
    pub total_count: i64,
    pub address: String,
}

impl NewOrder {
    /// Product names as stored in the single `order.name` column.
    pub fn names_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.names)?)
    }
}

/// Response of `POST /order`
#[derive(Debug, Clone, Serialize)]
pub struct PlaceOrderResponse {
    pub message: String,
    #[serde(rename = "orderId")]
    pub order_id: u64,
    #[serde(rename = "orderDetails")]
    pub order_details: NewOrder,
}

fn required<T>(field: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::validation(format!("missing required field: {}", field)))
}

fn required_text(field: &str, value: Option<String>) -> Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(Error::validation(format!(
            "missing required field: {}",
            field
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn line_item(value: serde_json::Value) -> Result<NewLineItem> {
        serde_json::from_value::<AddLineItemRequest>(value)
            .unwrap()
            .validate()
    }

    #[test]
    fn test_line_item_accepts_zero_count_and_price() {
        let item = line_item(json!({
            "name": "Apple",
            "price": 0,
            "count": 0,
            "order_id": "A1",
            "img_url": "http://x"
        }))
        .unwrap();

        assert_eq!(item.count, 0);
        assert_eq!(item.price, 0.0);
    }

    #[test]
    fn test_line_item_missing_field() {
        let err = line_item(json!({
            "name": "Apple",
            "price": 1000,
            "count": 2,
            "img_url": "http://x"
        }))
        .unwrap_err();

        assert!(matches!(err, Error::Validation(ref m) if m.contains("order_id")));
    }

    #[test]
    fn test_line_item_blank_text_is_missing() {
        let err = line_item(json!({
            "name": "   ",
            "price": 1000,
            "count": 2,
            "order_id": "A1",
            "img_url": "http://x"
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = line_item(json!({
            "name": "Apple",
            "price": 1000,
            "count": 2,
            "order_id": "",
            "img_url": "http://x"
        }))
        .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m.contains("order_id")));
    }

    #[test]
    fn test_order_key_keeps_shape() {
        let item = line_item(json!({
            "name": "Apple",
            "price": 1000,
            "count": 2,
            "order_id": 42,
            "img_url": "http://x"
        }))
        .unwrap();

        assert_eq!(item.order_id, OrderKey::Number(42));
        assert_eq!(item.order_id.to_string(), "42");
        assert_eq!(serde_json::to_value(&item).unwrap()["order_id"], json!(42));
    }

    #[test]
    fn test_place_order_totals() {
        let request = PlaceOrderRequest {
            names: Some(vec!["Apple".into(), "Banana".into()]),
            prices: Some(vec![1000.0, 2000.0]),
            counts: Some(vec![1, 2]),
            address: Some("Seoul".into()),
        };

        let order = request.validate().unwrap();
        assert_eq!(order.total_price, 3000.0);
        assert_eq!(order.total_count, 3);
        assert_eq!(order.names_json().unwrap(), r#"["Apple","Banana"]"#);
    }

    #[test]
    fn test_place_order_rejects_mismatched_lengths() {
        let request = PlaceOrderRequest {
            names: Some(vec!["Apple".into(), "Banana".into()]),
            prices: Some(vec![1000.0]),
            counts: Some(vec![1, 2]),
            address: Some("Seoul".into()),
        };

        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_place_order_rejects_empty_names() {
        let request = PlaceOrderRequest {
            names: Some(vec![]),
            prices: Some(vec![]),
            counts: Some(vec![]),
            address: Some("Seoul".into()),
        };

        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }

    #[test]
    fn test_place_order_count_overflow() {
        let request = PlaceOrderRequest {
            names: Some(vec!["a".into(), "b".into()]),
            prices: Some(vec![1.0, 1.0]),
            counts: Some(vec![i64::MAX, 1]),
            address: Some("Seoul".into()),
        };

        assert!(matches!(request.validate(), Err(Error::Validation(_))));
    }
}
