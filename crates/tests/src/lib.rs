//! Integration tests for the Courier server.
//!
//! Test modules:
//!
//! - `admission_pipeline_tests`: ordering and interaction of the rate
//!   limiter, request logger, and auth gate across the assembled router
//! - `api_flow_tests`: end-to-end register/login/refresh and CRUD flows
//!   through the full middleware stack
//!
//! Run with:
//! ```bash
//! cargo test --package tests
//! ```

#[cfg(test)]
mod admission_pipeline_tests;

#[cfg(test)]
mod api_flow_tests;
