//! In-process document store. Nothing survives a restart.

use super::{DocumentStore, StoredDocument};
use crate::error::AppError;
use crate::resource::Document;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

type Collections = HashMap<String, Vec<StoredDocument>>;

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, AppError> {
        self.collections
            .read()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, AppError> {
        self.collections
            .write()
            .map_err(|_| AppError::Store("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<StoredDocument>, AppError> {
        Ok(self.read()?.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: Uuid) -> Result<Option<StoredDocument>, AppError> {
        Ok(self
            .read()?
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.id == id))
            .cloned())
    }

    async fn insert(
        &self,
        collection: &str,
        id: Uuid,
        doc: Document,
    ) -> Result<StoredDocument, AppError> {
        let stored = StoredDocument { id, doc };
        self.write()?
            .entry(collection.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn update(
        &self,
        collection: &str,
        id: Uuid,
        patch: Document,
    ) -> Result<Option<StoredDocument>, AppError> {
        let mut guard = self.write()?;
        let Some(existing) = guard
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| d.id == id))
        else {
            return Ok(None);
        };
        existing.doc.extend(patch);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, collection: &str, id: Uuid) -> Result<bool, AppError> {
        let mut guard = self.write()?;
        let Some(docs) = guard.get_mut(collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|d| d.id != id);
        Ok(docs.len() < before)
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.read().map(|_| ())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn doc(v: Value) -> Document {
        match v {
            Value::Object(m) => m,
            _ => panic!("not an object"),
        }
    }

    #[tokio::test]
    async fn update_merges_and_keeps_omitted_fields() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store
            .insert("productos", id, doc(json!({"nombre": "Widget", "precio": 9.99})))
            .await
            .unwrap();

        let updated = store
            .update("productos", id, doc(json!({"precio": 5})))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(Value::Object(updated.doc), json!({"nombre": "Widget", "precio": 5}));
    }

    #[tokio::test]
    async fn collections_are_independent() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store.insert("productos", id, Document::new()).await.unwrap();

        assert!(store.get("usuarios", id).await.unwrap().is_none());
        assert!(!store.delete("usuarios", id).await.unwrap());
        assert_eq!(store.list("productos").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn list_keeps_insertion_order() {
        let store = MemoryDocumentStore::new();
        let ids: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for id in &ids {
            store.insert("usuarios", *id, Document::new()).await.unwrap();
        }
        let listed: Vec<Uuid> = store.list("usuarios").await.unwrap().into_iter().map(|d| d.id).collect();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn unknown_id_is_reported_as_absent() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        assert!(store.update("productos", id, Document::new()).await.unwrap().is_none());
        assert!(!store.delete("productos", id).await.unwrap());
    }
}
