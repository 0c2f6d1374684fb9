//! File upload and download over the object store.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct FileQuery {
    pub name: String,
}

/// `POST /upload?name=<key>`. Stores the raw request body.
pub async fn upload(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
    body: Bytes,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    if query.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Name is required".to_string()));
    }
    if body.is_empty() {
        return Err(ApiError::BadRequest("File body is empty".to_string()));
    }

    state.objects.put_object(&query.name, body.to_vec()).await?;
    tracing::info!(file = %query.name, bytes = body.len(), "file uploaded");
    Ok((StatusCode::CREATED, Json(json!({ "message": "File uploaded", "name": query.name }))))
}

/// `GET /download?name=<key>`. Streams the stored bytes back.
pub async fn download(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<Response, ApiError> {
    let data = state
        .objects
        .get_object(&query.name)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("File not found: {}", query.name)))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/octet-stream")],
        data,
    )
        .into_response())
}
