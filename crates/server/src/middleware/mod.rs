//! HTTP middleware components for the Courier server.
//!
//! This module contains Axum middleware adapters that wrap the business logic
//! components from `courier_core`. The middleware functions here handle
//! HTTP-specific concerns (request/response manipulation, status codes) while
//! delegating decisions to the core library.
//!
//! Layer order is fixed by `crate::router::build_router`: rate limiting
//! decides first, the logger observes everything that was admitted, and the
//! auth gate runs only on protected routes. A denied request never reaches
//! the layers behind the denial.

pub mod auth;
pub mod logging;
pub mod rate_limiting;

pub use auth::bearer_auth_middleware;
pub use logging::request_logger;
pub use rate_limiting::rate_limit_middleware;
