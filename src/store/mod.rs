//! Document persistence: one collection per resource kind, records keyed by UUID.

mod memory;
mod postgres;

pub use memory::MemoryDocumentStore;
pub use postgres::{connect_pool, PgDocumentStore};

use crate::error::AppError;
use crate::resource::{Document, ID_KEY};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// A record as held by the store: identifier plus field document.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: Uuid,
    pub doc: Document,
}

impl StoredDocument {
    /// Flatten into the wire shape: the fields plus `_id`.
    pub fn into_json(self) -> Value {
        let mut map = self.doc;
        map.insert(ID_KEY.to_string(), Value::String(self.id.to_string()));
        Value::Object(map)
    }
}

/// Backend for the CRUD service. Every operation touches at most one record
/// of one collection; no state is kept between calls beyond what is stored.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All records of a collection in insertion order.
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError>;

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, AppError>;

    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        doc: Document,
    ) -> Result<StoredDocument, AppError>;

    /// Merge `patch` into the stored document. Keys absent from the patch keep
    /// their value. Returns the post-update record, or None if `id` is unknown.
    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Document,
    ) -> Result<Option<StoredDocument>, AppError>;

    /// Returns false when no record had this id.
    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError>;

    /// Connectivity check used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    /// Short backend name reported by `/ready`.
    fn backend(&self) -> &'static str;

    /// Where collections live, e.g. the PostgreSQL schema. None for stores without one.
    fn namespace(&self) -> Option<&str> {
        None
    }
}
