//! JWT issuance and verification for the access and refresh flows.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AuthError;
use crate::config::AuthConfig;

/// Claims carried by every courier token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id the token was issued to.
    pub sub: String,
    /// Issued-at, seconds since the Unix epoch.
    pub iat: i64,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

/// Signs and verifies access and refresh tokens.
///
/// The two flows use independent HMAC secrets and lifetimes. Verification
/// is strict: HS256 only, zero leeway, so a token expires exactly at its
/// `exp` second.
pub struct TokenAuthority {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenAuthority {
    #[must_use]
    pub fn new(
        access_secret: &str,
        refresh_secret: &str,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(refresh_secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    #[must_use]
    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(
            &config.access_secret,
            &config.refresh_secret,
            config.access_ttl(),
            config.refresh_ttl(),
        )
    }

    /// Issues a short-lived access token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenCreation`] if signing fails.
    pub fn issue_access(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, &self.access_encoding, self.access_ttl)
    }

    /// Issues a long-lived refresh token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenCreation`] if signing fails.
    pub fn issue_refresh(&self, subject: &str) -> Result<String, AuthError> {
        self.issue(subject, &self.refresh_encoding, self.refresh_ttl)
    }

    /// Verifies an access token, returning its claims.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ExpiredToken`] past `exp`, or
    /// [`AuthError::InvalidToken`] for any other validation failure.
    pub fn verify_access(&self, token: &str) -> Result<Claims, AuthError> {
        Self::verify(token, &self.access_decoding)
    }

    /// Verifies a refresh token, returning its claims.
    ///
    /// Access tokens fail here because the secrets are independent.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ExpiredToken`] past `exp`, or
    /// [`AuthError::InvalidToken`] for any other validation failure.
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, AuthError> {
        Self::verify(token, &self.refresh_decoding)
    }

    fn issue(
        &self,
        subject: &str,
        key: &EncodingKey,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        };
        encode(&Header::new(Algorithm::HS256), &claims, key)
            .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    fn verify(token: &str, key: &DecodingKey) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}
