//! Framework-free admission components.
//!
//! The server crate wraps these in Axum middleware; the logic itself is
//! plain Rust so it can be unit-tested without HTTP machinery.

pub mod rate_limiting;

pub use rate_limiting::RateLimiter;
