//! CRUD request handlers.
//!
//! Handlers validate input, convert between the typed models in
//! `courier_core::types` and the JSON records the store traits speak, and
//! shape responses. Authentication and rate limiting are already settled
//! by the time a handler runs.

pub mod chats;
pub mod events;
pub mod files;
pub mod items;
pub mod maps;
pub mod orders;
pub mod users;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::ApiError;

/// Serializes a typed model into a store record.
pub(crate) fn to_record<T: Serialize>(value: &T) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Deserializes a store record back into a typed model.
pub(crate) fn from_record<T: DeserializeOwned>(record: Value) -> Result<T, ApiError> {
    serde_json::from_value(record).map_err(|e| ApiError::Internal(e.to_string()))
}

/// Rejects an empty or whitespace-only required field.
pub(crate) fn require(field: &str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::BadRequest(format!("{field} is required")));
    }
    Ok(())
}
