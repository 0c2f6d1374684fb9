//! Order CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courier_core::types::{now_millis, prefixed_id, Order};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{from_record, require, to_record};
use crate::{error::ApiError, state::AppState};

const TABLE: &str = "orders";

#[derive(Debug, Deserialize)]
pub struct CreateOrderRequest {
    pub user: String,
    pub status: String,
    #[serde(default)]
    pub items: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateOrderRequest {
    pub id: String,
    pub user: String,
    pub status: String,
    #[serde(default)]
    pub items: Vec<String>,
}

/// `POST /orders/new`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require("User", &req.user)?;
    require("Status", &req.status)?;

    let order = Order {
        id: prefixed_id("o"),
        user: req.user,
        status: req.status,
        items: req.items,
        created_at: now_millis(),
    };
    state.store.put(TABLE, &order.id, to_record(&order)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Order created", "id": order.id }))))
}

/// `GET /orders/all`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let mut orders = Vec::new();
    for record in state.store.scan(TABLE).await? {
        orders.push(from_record(record)?);
    }
    Ok(Json(orders))
}

/// `GET /orders/order/:id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let record = state
        .store
        .get(TABLE, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {id}")))?;
    Ok(Json(from_record(record)?))
}

/// `PUT /orders/order/update`.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateOrderRequest>,
) -> Result<Json<Value>, ApiError> {
    require("Id", &req.id)?;
    require("User", &req.user)?;
    require("Status", &req.status)?;

    let record = state
        .store
        .get(TABLE, &req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order not found: {}", req.id)))?;
    let mut order: Order = from_record(record)?;
    order.user = req.user;
    order.status = req.status;
    order.items = req.items;

    state.store.update(TABLE, &order.id, to_record(&order)?).await?;
    Ok(Json(json!({ "message": "Order updated", "id": order.id })))
}

/// `DELETE /orders/order/:id/delete`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete(TABLE, &id).await? {
        return Err(ApiError::NotFound(format!("Order not found: {id}")));
    }
    Ok(Json(json!({ "message": "Order deleted", "id": id })))
}
