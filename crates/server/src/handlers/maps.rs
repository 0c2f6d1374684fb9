//! Mapping routes: directions, geocoding, reverse geocoding.
//!
//! These proxy to the configured [`courier_core::mapping::MapsClient`];
//! when no provider is configured they answer `503`.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::{error::ApiError, state::AppState};

/// `GET /maps/from/:origin/to/:destination`.
pub async fn directions(
    State(state): State<AppState>,
    Path((origin, destination)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.maps.directions(&origin, &destination).await?))
}

/// `GET /maps/geocode/:address`.
pub async fn geocode(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.maps.geocode(&address).await?))
}

/// `GET /maps/reversegeocode/lat/:lat/long/:long`. Non-numeric
/// coordinates are rejected before the provider is contacted.
pub async fn reverse_geocode(
    State(state): State<AppState>,
    Path((lat, long)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let lat: f64 = lat
        .parse()
        .map_err(|_| ApiError::BadRequest("Latitude is invalid".to_string()))?;
    let long: f64 = long
        .parse()
        .map_err(|_| ApiError::BadRequest("Longitude is invalid".to_string()))?;
    Ok(Json(state.maps.reverse_geocode(lat, long).await?))
}
