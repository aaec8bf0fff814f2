//! API handlers

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;

use crate::api::{ApiError, AppState};
use crate::types::{
    AddLineItemRequest, LineItem, NewLineItem, PlaceOrderRequest, PlaceOrderResponse, Product,
};

/// Health check backed by a store round trip
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state
        .store
        .ping()
        .await
        .map_err(|e| ApiError::with_context(e, "Store unavailable"))?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// List the whole catalog. An empty catalog is still a 200.
pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .list_products()
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to load products"))?;

    tracing::debug!(count = products.len(), "Listed products");
    Ok(Json(products))
}

/// Products whose name contains the category text
pub async fn search_products(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Product>>, ApiError> {
    let products = state
        .store
        .search_products(&category)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to search products"))?;

    if products.is_empty() {
        tracing::debug!(%category, "No products matched category");
        return Err(ApiError::not_found("No products found for this category"));
    }

    Ok(Json(products))
}

/// Line items recorded for an order
pub async fn order_line_items(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<Json<Vec<LineItem>>, ApiError> {
    let items = state
        .store
        .order_line_items(&order_id)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to load order items"))?;

    if items.is_empty() {
        tracing::debug!(%order_id, "No line items for order");
        return Err(ApiError::not_found("No items found for this order"));
    }

    Ok(Json(items))
}

/// Record one cart line item
pub async fn add_line_item(
    State(state): State<AppState>,
    payload: Result<Json<AddLineItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<NewLineItem>), ApiError> {
    let Json(request) = payload?;
    let item = request.validate()?;

    state
        .store
        .insert_line_item(&item)
        .await
        .map_err(|e| ApiError::with_context(e, "Failed to add product"))?;

    tracing::info!(
        order_id = %item.order_id,
        name = %item.name,
        count = item.count,
        "Line item added"
    );

    Ok((StatusCode::CREATED, Json(item)))
}

/// Aggregate the cart and insert one order row
pub async fn place_order(
    State(state): State<AppState>,
    payload: Result<Json<PlaceOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PlaceOrderResponse>), ApiError> {
    let Json(request) = payload?;
    let body = request.clone();
    let order = request.validate()?;

    let order_id = match state.store.insert_order(&order).await {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, body = ?body, "Failed to place order");
            return Err(ApiError::internal("Failed to place order"));
        }
    };

    tracing::info!(
        order_id,
        total_price = order.total_price,
        total_count = order.total_count,
        "Order placed"
    );

    Ok((
        StatusCode::CREATED,
        Json(PlaceOrderResponse {
            message: "Order placed successfully".to_string(),
            order_id,
            order_details: order,
        }),
    ))
}
