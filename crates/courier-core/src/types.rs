//! Domain models shared between the core library and the HTTP layer.
//!
//! All timestamps are Unix epoch milliseconds (`i64`). Record identifiers
//! carry a short type prefix (`u_`, `c_`, `m_`, `e_`, `i_`, `o_`) followed
//! by a UUID so an id alone identifies its table.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Current time as Unix epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Generates a prefixed record identifier, e.g. `u_550e8400-...`.
#[must_use]
pub fn prefixed_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4())
}

/// A registered user. The password is stored only as an Argon2id hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// User view safe to return to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: i64,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self { id: user.id, name: user.name, email: user.email, created_at: user.created_at }
    }
}

/// A chat room with a member list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chat {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: i64,
}

/// A single message within a chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub sender: String,
    pub body: String,
    pub created_at: i64,
}

/// A scheduled event with optional location and notification times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
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
    pub active: bool,
    pub created_at: i64,
}

/// A catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    pub price: f64,
    pub inventory: i64,
    pub active: bool,
    pub created_at: i64,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// An order placed by a user, referencing item ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub user: String,
    pub status: String,
    #[serde(default)]
    pub items: Vec<String>,
    pub created_at: i64,
}
