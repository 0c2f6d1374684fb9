//! User registration, login, token refresh, and account CRUD.
//!
//! Registration, login, and refresh are the only public routes in the
//! application; everything else in this module sits behind the auth gate.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courier_core::{
    auth::{password, AuthError},
    types::{now_millis, prefixed_id, PublicUser, User},
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{from_record, require, to_record};
use crate::{error::ApiError, state::AppState};

const TABLE: &str = "users";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub id: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub id: String,
    pub name: String,
    pub email: String,
}

async fn find_by_email(state: &AppState, email: &str) -> Result<Option<User>, ApiError> {
    for record in state.store.scan(TABLE).await? {
        let user: User = from_record(record)?;
        if user.email == email {
            return Ok(Some(user));
        }
    }
    Ok(None)
}

/// `POST /users/new` (public). Creates a user with a hashed password.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require("Name", &req.name)?;
    require("Email", &req.email)?;
    require("Password", &req.password)?;
    if !req.email.contains('@') {
        return Err(ApiError::BadRequest("Email is invalid".to_string()));
    }
    if find_by_email(&state, &req.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email is already registered".to_string()));
    }

    let user = User {
        id: prefixed_id("u"),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        password_hash: password::hash_password(&req.password)?,
        created_at: now_millis(),
    };
    state.store.put(TABLE, &user.id, to_record(&user)?).await?;

    tracing::info!(user = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(json!({ "message": "User created", "id": user.id }))))
}

/// `POST /users/login` (public). Verifies credentials and issues both tokens.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let user = find_by_email(&state, &req.email)
        .await?
        .filter(|u| password::verify_password(&req.password, &u.password_hash))
        .ok_or(AuthError::InvalidCredentials)?;

    let access_token = state.tokens.issue_access(&user.id)?;
    let refresh_token = state.tokens.issue_refresh(&user.id)?;

    tracing::info!(user = %user.id, "user logged in");
    Ok(Json(json!({
        "access_token": access_token,
        "refresh_token": refresh_token,
        "user": PublicUser::from(user),
    })))
}

/// `POST /users/refresh` (public). Exchanges a refresh token for a new
/// access token.
///
/// Identity comes from the verified token's claims; the body's `id` must
/// match them or the exchange is refused.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<Value>, ApiError> {
    let claims = state.tokens.verify_refresh(&req.token)?;
    if claims.sub != req.id {
        tracing::warn!(claimed = %req.id, subject = %claims.sub, "refresh id mismatch");
        return Err(ApiError::Unauthorized("Failed to verify token".to_string()));
    }

    let access_token = state.tokens.issue_access(&claims.sub)?;
    Ok(Json(json!({ "access_token": access_token })))
}

/// `GET /users/all`. Lists users without password hashes.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let mut users = Vec::new();
    for record in state.store.scan(TABLE).await? {
        let user: User = from_record(record)?;
        users.push(PublicUser::from(user));
    }
    Ok(Json(users))
}

/// `GET /users/id/:id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, ApiError> {
    let record = state
        .store
        .get(TABLE, &id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {id}")))?;
    let user: User = from_record(record)?;
    Ok(Json(PublicUser::from(user)))
}

/// `PUT /users/update`. Updates name and email; the password hash is
/// carried over untouched.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateUserRequest>,
) -> Result<Json<Value>, ApiError> {
    require("Id", &req.id)?;
    require("Name", &req.name)?;
    require("Email", &req.email)?;

    let record = state
        .store
        .get(TABLE, &req.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User not found: {}", req.id)))?;
    let mut user: User = from_record(record)?;
    user.name = req.name.trim().to_string();
    user.email = req.email.trim().to_string();

    state.store.update(TABLE, &user.id, to_record(&user)?).await?;
    Ok(Json(json!({ "message": "User updated", "id": user.id })))
}

/// `DELETE /users/delete/:id`.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete(TABLE, &id).await? {
        return Err(ApiError::NotFound(format!("User not found: {id}")));
    }
    Ok(Json(json!({ "message": "User deleted", "id": id })))
}
