//! Catalog item CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courier_core::types::{now_millis, prefixed_id, Item};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{from_record, require, to_record};
use crate::{error::ApiError, state::AppState};

const TABLE: &str = "items";

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub inventory: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateItemRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreateItemRequest,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate(req: &CreateItemRequest) -> Result<(), ApiError> {
    require("Name", &req.name)?;
    if req.price < 0.0 {
        return Err(ApiError::BadRequest("Price must not be negative".to_string()));
    }
    if req.inventory < 0 {
        return Err(ApiError::BadRequest("Inventory must not be negative".to_string()));
    }
    Ok(())
}

/// `POST /items/new`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateItemRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate(&req)?;

    let item = Item {
        id: prefixed_id("i"),
        name: req.name.trim().to_string(),
        description: req.description,
        images: req.images,
        price: req.price,
        inventory: req.inventory,
        active: true,
        created_at: now_millis(),
        updated_at: None,
    };
    state.store.put(TABLE, &item.id, to_record(&item)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Item created", "id": item.id }))))
}

/// `GET /items/all`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Item>>, ApiError> {
    let mut items = Vec::new();
    for record in state.store.scan(TABLE).await? {
        items.push(from_record(record)?);
    }
    Ok(Json(items))
}

/// `GET /items/item/:id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let record = state
        .store
        .get(TABLE, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found: {id}")))?;
    Ok(Json(from_record(record)?))
}

/// `PUT /items/item/update`. Stamps `updated_at`.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateItemRequest>,
) -> Result<Json<Value>, ApiError> {
    require("Id", &req.id)?;
    validate(&req.fields)?;

    let record = state
        .store
        .get(TABLE, &req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Item not found: {}", req.id)))?;
    let mut item: Item = from_record(record)?;
    item.name = req.fields.name.trim().to_string();
    item.description = req.fields.description;
    item.images = req.fields.images;
    item.price = req.fields.price;
    item.inventory = req.fields.inventory;
    item.active = req.active;
    item.updated_at = Some(now_millis());

    state.store.update(TABLE, &item.id, to_record(&item)?).await?;
    Ok(Json(json!({ "message": "Item updated", "id": item.id })))
}

/// `DELETE /items/item/:id/delete`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete(TABLE, &id).await? {
        return Err(ApiError::NotFound(format!("Item not found: {id}")));
    }
    Ok(Json(json!({ "message": "Item deleted", "id": id })))
}
