//! Shared application state handed to every handler.

use std::sync::Arc;

use courier_core::{
    auth::TokenAuthority,
    mapping::MapsClient,
    store::{ObjectStore, RecordStore},
};

/// Handles to the storage backends, maps client, and token authority.
///
/// Cloning is cheap; all fields are shared `Arc`s.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub objects: Arc<dyn ObjectStore>,
    pub maps: Arc<dyn MapsClient>,
    pub tokens: Arc<TokenAuthority>,
}

impl AppState {
    #[must_use]
    pub fn new(
        store: Arc<dyn RecordStore>,
        objects: Arc<dyn ObjectStore>,
        maps: Arc<dyn MapsClient>,
        tokens: Arc<TokenAuthority>,
    ) -> Self {
        Self { store, objects, maps, tokens }
    }
}
