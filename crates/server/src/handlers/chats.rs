//! Chat and chat-message CRUD.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use courier_core::types::{now_millis, prefixed_id, Chat, ChatMessage};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{from_record, require, to_record};
use crate::{error::ApiError, state::AppState};

const CHATS: &str = "chats";
const MESSAGES: &str = "messages";

#[derive(Debug, Deserialize)]
pub struct CreateChatRequest {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChatRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub sender: String,
    pub body: String,
}

async fn load_chat(state: &AppState, id: &str) -> Result<Chat, ApiError> {
    let record = state
        .store
        .get(CHATS, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Chat not found: {id}")))?;
    from_record(record)
}

/// `POST /chats/new`.
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateChatRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require("Name", &req.name)?;

    let chat = Chat {
        id: prefixed_id("c"),
        name: req.name.trim().to_string(),
        members: req.members,
        created_at: now_millis(),
    };
    state.store.put(CHATS, &chat.id, to_record(&chat)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Chat created", "id": chat.id }))))
}

/// `GET /chats/all`.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Chat>>, ApiError> {
    let mut chats = Vec::new();
    for record in state.store.scan(CHATS).await? {
        chats.push(from_record(record)?);
    }
    Ok(Json(chats))
}

/// `GET /chats/chat/:id`.
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Chat>, ApiError> {
    Ok(Json(load_chat(&state, &id).await?))
}

/// `PUT /chats/chat/update`.
pub async fn update(
    State(state): State<AppState>,
    Json(req): Json<UpdateChatRequest>,
) -> Result<Json<Value>, ApiError> {
    require("Id", &req.id)?;
    require("Name", &req.name)?;

    let mut chat = load_chat(&state, &req.id).await?;
    chat.name = req.name.trim().to_string();
    chat.members = req.members;

    state.store.update(CHATS, &chat.id, to_record(&chat)?).await?;
    Ok(Json(json!({ "message": "Chat updated", "id": chat.id })))
}

/// `DELETE /chats/chat/:id/delete`. Removes the chat and its messages.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    if !state.store.delete(CHATS, &id).await? {
        return Err(ApiError::NotFound(format!("Chat not found: {id}")));
    }

    for record in state.store.scan(MESSAGES).await? {
        let message: ChatMessage = from_record(record)?;
        if message.chat_id == id {
            state.store.delete(MESSAGES, &message.id).await?;
        }
    }
    Ok(Json(json!({ "message": "Chat deleted", "id": id })))
}

/// `POST /chats/chat/:id/messages/new`.
pub async fn create_message(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
    Json(req): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require("Sender", &req.sender)?;
    require("Body", &req.body)?;
    load_chat(&state, &chat_id).await?;

    let message = ChatMessage {
        id: prefixed_id("m"),
        chat_id,
        sender: req.sender,
        body: req.body,
        created_at: now_millis(),
    };
    state.store.put(MESSAGES, &message.id, to_record(&message)?).await?;
    Ok((StatusCode::CREATED, Json(json!({ "message": "Message created", "id": message.id }))))
}

/// `GET /chats/chat/:id/messages`. Messages ordered oldest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Path(chat_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, ApiError> {
    load_chat(&state, &chat_id).await?;

    let mut messages = Vec::new();
    for record in state.store.scan(MESSAGES).await? {
        let message: ChatMessage = from_record(record)?;
        if message.chat_id == chat_id {
            messages.push(message);
        }
    }
    messages.sort_by_key(|m| m.created_at);
    Ok(Json(messages))
}

/// `DELETE /chats/chat/:id/messages/message/:message_id/delete`.
pub async fn delete_message(
    State(state): State<AppState>,
    Path((chat_id, message_id)): Path<(String, String)>,
) -> Result<Json<Value>, ApiError> {
    let record = state
        .store
        .get(MESSAGES, &message_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Message not found: {message_id}")))?;
    let message: ChatMessage = from_record(record)?;
    if message.chat_id != chat_id {
        return Err(ApiError::NotFound(format!("Message not found: {message_id}")));
    }

    state.store.delete(MESSAGES, &message_id).await?;
    Ok(Json(json!({ "message": "Message deleted", "id": message_id })))
}
