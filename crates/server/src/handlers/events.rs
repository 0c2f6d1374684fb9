//! Event CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courier_core::types::{now_millis, prefixed_id, Event};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{from_record, require, to_record};
use crate::{error::ApiError, state::AppState};

const TABLE: &str = "events";

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_date: i64,
    pub end_date: i64,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    #[serde(default)]
    pub location_name: Option<String>,
    #[serde(default)]
    pub location_address: Option<String>,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_long: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub first_notification: Option<i64>,
    #[serde(default)]
    pub second_notification: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub id: String,
    #[serde(flatten)]
    pub fields: CreateEventRequest,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

fn validate(req: &CreateEventRequest) -> Result<(), ApiError> {
    require("Name", &req.name)?;
    if req.start_date <= 0 {
        return Err(ApiError::BadRequest("Start date is required".to_string()));
    }
    if req.end_date <= 0 {
        return Err(ApiError::BadRequest("End date is required".to_string()));
    }
    if req.end_date < req.start_date {
        return Err(ApiError::BadRequest("End date must not precede start date".to_string()));
    }
    Ok(())
}

fn apply(event: &mut Event, req: CreateEventRequest) {
    event.name = req.name.trim().to_string();
    event.description = req.description;
    event.start_date = req.start_date;
    event.end_date = req.end_date;
    event.assigned_to = req.assigned_to;
    event.location_name = req.location_name;
    event.location_address = req.location_address;
    event.location_lat = req.location_lat;
    event.location_long = req.location_long;
    event.notes = req.notes;
    event.first_notification = req.first_notification;
    event.second_notification = req.second_notification;
}

/// `POST /events/new`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    validate(&req)?;

    let mut event = Event {
        id: prefixed_id("e"),
        name: String::new(),
        description: None,
        start_date: 0,
        end_date: 0,
        assigned_to: Vec::new(),
        location_name: None,
        location_address: None,
        location_lat: None,
        location_long: None,
        notes: None,
        first_notification: None,
        second_notification: None,
        active: true,
        created_at: now_millis(),
    };
    apply(&mut event, req);

    state.store.put(TABLE, &event.id, to_record(&event)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Event created", "id": event.id }))))
}

/// `GET /events/all`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    let mut events = Vec::new();
    for record in state.store.scan(TABLE).await? {
        events.push(from_record(record)?);
    }
    Ok(Json(events))
}

/// `GET /events/event/:id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, ApiError> {
    let record = state
        .store
        .get(TABLE, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {id}")))?;
    Ok(Json(from_record(record)?))
}

/// `PUT /events/event/update`.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateEventRequest>,
) -> Result<Json<Value>, ApiError> {
    require("Id", &req.id)?;
    validate(&req.fields)?;

    let record = state
        .store
        .get(TABLE, &req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event not found: {}", req.id)))?;
    let mut event: Event = from_record(record)?;
    apply(&mut event, req.fields);
    event.active = req.active;

    state.store.update(TABLE, &event.id, to_record(&event)?).await?;
    Ok(Json(json!({ "message": "Event updated", "id": event.id })))
}

/// `DELETE /events/event/:id/delete`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete(TABLE, &id).await? {
        return Err(ApiError::NotFound(format!("Event not found: {id}")));
    }
    Ok(Json(json!({ "message": "Event deleted", "id": id })))
}
