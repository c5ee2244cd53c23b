//! In-memory record store.
//!
//! Records live in insertion order per collection behind a mutex that is held
//! for exactly one operation. Uses canonical field naming.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::error::{Error, Result};
use crate::record::{
    next_id, validate_fields, FieldNaming, Fields, Record, RecordFilter, RecordStore,
};

#[derive(Debug, Default)]
pub struct MemoryBackend {
    collections: Mutex<BTreeMap<String, Vec<Record>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a backend pre-populated with records, keeping their ids.
    pub fn from_records(collections: BTreeMap<String, Vec<Record>>) -> Self {
        MemoryBackend {
            collections: Mutex::new(collections),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<Record>>>> {
        self.collections
            .lock()
            .map_err(|_| Error::Transport("memory store poisoned".into()))
    }
}

impl RecordStore for MemoryBackend {
    fn naming(&self) -> FieldNaming {
        FieldNaming::Canonical
    }

    async fn list(&self, collection: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        let guard = self.lock()?;
        Ok(guard
            .get(collection)
            .map(|records| {
                records
                    .iter()
                    .filter(|r| filter.matches(&r.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: u64) -> Result<Record> {
        let guard = self.lock()?;
        guard
            .get(collection)
            .and_then(|records| records.iter().find(|r| r.id == id))
            .cloned()
            .ok_or_else(|| Error::not_found(collection, id))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Record> {
        validate_fields(&fields)?;
        let mut guard = self.lock()?;
        let records = guard.entry(collection.to_string()).or_default();
        let record = Record {
            id: next_id(records),
            fields,
        };
        records.push(record.clone());
        debug!(collection, id = record.id, "memory: created record");
        Ok(record)
    }

    async fn update(&self, collection: &str, id: u64, fields: Fields) -> Result<Record> {
        validate_fields(&fields)?;
        let mut guard = self.lock()?;
        let record = guard
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id))
            .ok_or_else(|| Error::not_found(collection, id))?;
        record.fields.extend(fields);
        Ok(record.clone())
    }

    async fn delete(&self, collection: &str, id: u64) -> Result<Record> {
        let mut guard = self.lock()?;
        let records = guard
            .get_mut(collection)
            .ok_or_else(|| Error::not_found(collection, id))?;
        let idx = records
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| Error::not_found(collection, id))?;
        Ok(records.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: serde_json::Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn create_assigns_sequential_ids() {
        let store = MemoryBackend::new();
        let a = store.create("tasks", fields(json!({"title": "a"}))).await.unwrap();
        let b = store.create("tasks", fields(json!({"title": "b"}))).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        // Collections are independent.
        let c = store.create("categories", fields(json!({"name": "c"}))).await.unwrap();
        assert_eq!(c.id, 1);
    }

    #[tokio::test]
    async fn update_merges_fields() {
        let store = MemoryBackend::new();
        let a = store
            .create("tasks", fields(json!({"title": "a", "completed": false})))
            .await
            .unwrap();
        let updated = store
            .update("tasks", a.id, fields(json!({"completed": true})))
            .await
            .unwrap();
        assert_eq!(updated.fields["title"], "a");
        assert_eq!(updated.fields["completed"], true);
    }

    #[tokio::test]
    async fn rejects_id_writes() {
        let store = MemoryBackend::new();
        let err = store.create("tasks", fields(json!({"id": 5}))).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn missing_ids_are_not_found() {
        let store = MemoryBackend::new();
        store.create("tasks", fields(json!({"title": "a"}))).await.unwrap();
        let err = store.delete("tasks", 42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { kind: "Task", id: 42 }));
        assert_eq!(store.list("tasks", &RecordFilter::all()).await.unwrap().len(), 1);
        assert!(store.get("categories", 1).await.is_err());
    }

    #[tokio::test]
    async fn list_applies_filter_in_insertion_order() {
        let store = MemoryBackend::new();
        for (t, archived) in [("a", false), ("b", true), ("c", false)] {
            store
                .create("tasks", fields(json!({"title": t, "archived": archived})))
                .await
                .unwrap();
        }
        let live = store
            .list("tasks", &RecordFilter::all().eq("archived", false))
            .await
            .unwrap();
        let titles: Vec<_> = live.iter().map(|r| r.fields["title"].clone()).collect();
        assert_eq!(titles, vec![json!("a"), json!("c")]);
    }
}
