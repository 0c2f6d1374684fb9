//! Storage seams.
//!
//! Handlers depend on the [`RecordStore`] and [`ObjectStore`] traits, never
//! on a concrete backend. The in-memory implementations here back tests and
//! development; a production deployment plugs a database behind the same
//! traits.

pub mod objects;

pub use objects::{MemoryObjectStore, ObjectStore};

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use thiserror::Error;

/// Errors from the record storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("Record not found: {0}")]
    NotFound(String),

    /// A record could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The backend failed.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Table-oriented record storage keyed by record id.
///
/// Records are JSON values; the typed models in [`crate::types`] are
/// converted at the handler boundary.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts or replaces a record.
    async fn put(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError>;

    /// Fetches a record by id. `None` if the record does not exist.
    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Replaces an existing record. Fails with [`StoreError::NotFound`] if
    /// the record does not exist.
    async fn update(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError>;

    /// Deletes a record. Returns whether a record was removed.
    async fn delete(&self, table: &str, id: &str) -> Result<bool, StoreError>;

    /// Returns every record in a table. Order is unspecified.
    async fn scan(&self, table: &str) -> Result<Vec<Value>, StoreError>;
}

/// In-memory [`RecordStore`] backed by concurrent maps.
#[derive(Default)]
pub struct MemoryStore {
    tables: DashMap<String, DashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn put(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError> {
        self.tables
            .entry(table.to_string())
            .or_default()
            .insert(id.to_string(), record);
        Ok(())
    }

    async fn get(&self, table: &str, id: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.tables.get(table).and_then(|t| t.get(id).map(|r| r.clone())))
    }

    async fn update(&self, table: &str, id: &str, record: Value) -> Result<(), StoreError> {
        let table_map = self
            .tables
            .get(table)
            .ok_or_else(|| StoreError::NotFound(format!("{table}/{id}")))?;
        let result = match table_map.get_mut(id) {
            Some(mut existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("{table}/{id}"))),
        };
        result
    }

    async fn delete(&self, table: &str, id: &str) -> Result<bool, StoreError> {
        Ok(self
            .tables
            .get(table)
            .is_some_and(|t| t.remove(id).is_some()))
    }

    async fn scan(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        Ok(self
            .tables
            .get(table)
            .map(|t| t.iter().map(|r| r.value().clone()).collect())
            .unwrap_or_default())
    }
}
