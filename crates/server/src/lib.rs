//! HTTP layer for the Courier backend.
//!
//! This crate adapts `courier-core` to Axum: middleware wrappers for the
//! admission pipeline, a declarative route table, and the CRUD handlers.
//! Every request passes the same fixed pipeline before its handler runs:
//!
//! ```text
//! rate limiter -> request logger -> auth gate (protected routes) -> handler
//! ```
//!
//! The only routes that skip the auth gate are user registration, login,
//! and token refresh.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
