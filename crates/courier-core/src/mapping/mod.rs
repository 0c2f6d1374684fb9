//! Outbound mapping and geocoding client.
//!
//! The [`MapsClient`] trait is the seam: the server wires in
//! [`HttpMapsClient`] when a provider is configured and
//! [`DisabledMapsClient`] otherwise, so the maps routes exist either way
//! and fail cleanly when unconfigured.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::config::MapsConfig;

/// Errors from the mapping layer.
#[derive(Debug, Error)]
pub enum MapsError {
    /// The upstream provider request failed.
    #[error("Maps provider error: {0}")]
    Backend(String),

    /// No provider is configured.
    #[error("maps client is not configured")]
    Disabled,
}

/// Directions, geocoding, and reverse geocoding against a mapping provider.
#[async_trait]
pub trait MapsClient: Send + Sync {
    /// Driving directions between two free-form place strings.
    async fn directions(&self, origin: &str, destination: &str) -> Result<Value, MapsError>;

    /// Resolves a free-form address to coordinates.
    async fn geocode(&self, address: &str) -> Result<Value, MapsError>;

    /// Resolves coordinates to the nearest address.
    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Value, MapsError>;
}

/// [`MapsClient`] backed by a Google-style HTTP API.
pub struct HttpMapsClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpMapsClient {
    /// Builds a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MapsError::Backend`] if the HTTP client cannot be built.
    pub fn from_config(config: &MapsConfig) -> Result<Self, MapsError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| MapsError::Backend(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, MapsError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| MapsError::Backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(MapsError::Backend(format!(
                "provider returned status {}",
                response.status()
            )));
        }

        response.json().await.map_err(|e| MapsError::Backend(e.to_string()))
    }
}

#[async_trait]
impl MapsClient for HttpMapsClient {
    async fn directions(&self, origin: &str, destination: &str) -> Result<Value, MapsError> {
        self.get_json(
            "/maps/api/directions/json",
            &[("origin", origin.to_string()), ("destination", destination.to_string())],
        )
        .await
    }

    async fn geocode(&self, address: &str) -> Result<Value, MapsError> {
        self.get_json("/maps/api/geocode/json", &[("address", address.to_string())]).await
    }

    async fn reverse_geocode(&self, lat: f64, lng: f64) -> Result<Value, MapsError> {
        self.get_json("/maps/api/geocode/json", &[("latlng", format!("{lat},{lng}"))]).await
    }
}

/// [`MapsClient`] used when no provider is configured. Every call fails
/// with [`MapsError::Disabled`].
pub struct DisabledMapsClient;

#[async_trait]
impl MapsClient for DisabledMapsClient {
    async fn directions(&self, _origin: &str, _destination: &str) -> Result<Value, MapsError> {
        Err(MapsError::Disabled)
    }

    async fn geocode(&self, _address: &str) -> Result<Value, MapsError> {
        Err(MapsError::Disabled)
    }

    async fn reverse_geocode(&self, _lat: f64, _lng: f64) -> Result<Value, MapsError> {
        Err(MapsError::Disabled)
    }
}
