//! Generic CRUD execution against a `DocumentStore`.

use super::validation::parse_id;
use crate::error::AppError;
use crate::resource::{Document, ResourceKind};
use crate::store::DocumentStore;
use serde_json::Value;
use uuid::Uuid;

pub struct CrudService;

impl CrudService {
    /// All records of `kind`, each with its `_id`.
    pub async fn list(store: &dyn DocumentStore, kind: ResourceKind) -> Result<Vec<Value>, AppError> {
        let docs = store.list(kind.collection()).await?;
        Ok(docs.into_iter().map(|d| d.into_json()).collect())
    }

    /// Fetch one record. The id is validated before the store is consulted.
    pub async fn read(store: &dyn DocumentStore, kind: ResourceKind, id_str: &str) -> Result<Value, AppError> {
        let id = parse_id(id_str)?;
        store
            .get(kind.collection(), id)
            .await?
            .map(|d| d.into_json())
            .ok_or_else(|| AppError::NotFound(kind.label().into()))
    }

    /// Persist a new record under a fresh server-assigned id. Returns the created record.
    pub async fn create(store: &dyn DocumentStore, kind: ResourceKind, body: Document) -> Result<Value, AppError> {
        let doc = kind.project(body);
        let id = Uuid::new_v4();
        let created = store.insert(kind.collection(), id, doc).await?;
        tracing::info!(kind = kind.label(), %id, "record created");
        Ok(created.into_json())
    }

    /// Merge the supplied fields into an existing record. Returns the updated record.
    pub async fn update(
        store: &dyn DocumentStore,
        kind: ResourceKind,
        id_str: &str,
        body: Document,
    ) -> Result<Value, AppError> {
        let id = parse_id(id_str)?;
        let patch = kind.project(body);
        let updated = store
            .update(kind.collection(), id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound(kind.label().into()))?;
        tracing::info!(kind = kind.label(), %id, "record updated");
        Ok(updated.into_json())
    }

    pub async fn delete(store: &dyn DocumentStore, kind: ResourceKind, id_str: &str) -> Result<(), AppError> {
        let id = parse_id(id_str)?;
        if !store.delete(kind.collection(), id).await? {
            return Err(AppError::NotFound(kind.label().into()));
        }
        tracing::info!(kind = kind.label(), %id, "record deleted");
        Ok(())
    }
}
