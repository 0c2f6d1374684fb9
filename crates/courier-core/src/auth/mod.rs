//! Authentication primitives.
//!
//! Two independent token flows share one signing engine:
//!
//! - **Access tokens** gate every protected route. Short-lived, verified on
//!   each request by the server's auth middleware.
//! - **Refresh tokens** are exchanged for fresh access tokens at the public
//!   refresh endpoint. Long-lived, signed with a separate secret so a leaked
//!   access key can never mint refresh tokens.
//!
//! Password storage uses Argon2id with per-password random salts; see
//! [`password`].

pub mod password;
pub mod token;

pub use token::{Claims, TokenAuthority};

use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No Authorization header was provided.
    #[error("Missing authorization header")]
    MissingAuthHeader,

    /// The Authorization header was not a Bearer token.
    #[error("Malformed authorization header")]
    MalformedAuthHeader,

    /// The token failed signature or claim validation.
    #[error("Failed to verify token")]
    InvalidToken,

    /// The token's expiry is in the past.
    #[error("Token has expired")]
    ExpiredToken,

    /// Supplied credentials did not match a known user.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Signing a new token failed.
    #[error("Failed to create token: {0}")]
    TokenCreation(String),

    /// Hashing or parsing a password hash failed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}
