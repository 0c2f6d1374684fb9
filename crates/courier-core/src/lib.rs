//! # Courier Core
//!
//! Core library for the Courier CRUD backend.
//!
//! This crate provides the business-logic layer consumed by the `server`
//! crate:
//!
//! - **[`middleware`]**: the request-admission pipeline components —
//!   per-client token-bucket rate limiting with idle eviction.
//!
//! - **[`auth`]**: JWT issuance and verification (access and refresh
//!   flows) and Argon2id password hashing.
//!
//! - **[`store`]**: storage seams (`RecordStore`, `ObjectStore`) with
//!   in-memory reference implementations; production deployments plug a
//!   real backend in behind the same traits.
//!
//! - **[`mapping`]**: outbound mapping/geocoding client seam.
//!
//! - **[`config`]**: layered application configuration.
//!
//! - **[`types`]**: domain models (users, chats, events, items, orders).
//!
//! ## Request Flow
//!
//! ```text
//! Client Request
//!       │
//!       ▼
//! ┌──────────────┐
//! │ Rate Limiter │ ─── Deny ──► 429 Too Many Requests
//! └──────┬───────┘
//!        │ Admit
//!        ▼
//! ┌──────────────┐
//! │   Logger     │  (observes; never alters)
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌──────────────┐
//! │  Auth Gate   │ ─── Invalid ──► 401 {"error": ...}
//! │ (protected)  │
//! └──────┬───────┘
//!        │ Claims
//!        ▼
//! ┌──────────────┐
//! │   Handler    │ ──► RecordStore / ObjectStore / MapsClient
//! └──────────────┘
//! ```
//!
//! The HTTP adapters (Axum middleware, routing, handlers) live in the
//! `server` crate; everything here is framework-free and unit-testable
//! without HTTP machinery.

pub mod auth;
pub mod config;
pub mod mapping;
pub mod middleware;
pub mod store;
pub mod types;
