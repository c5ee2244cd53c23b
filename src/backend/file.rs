//! JSON file record store.
//!
//! The whole document (every collection) lives in one JSON file with
//! snake_case field names. Writes go to a copy of the document that is
//! persisted via temp file + rename and only then replaces the cached copy,
//! so a failed write leaves both the file and the cache untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::record::{
    next_id, validate_fields, FieldNaming, Fields, Record, RecordFilter, RecordStore,
};

/// On-disk document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Database {
    #[serde(default)]
    pub collections: BTreeMap<String, Vec<Record>>,
}

impl Database {
    /// Load database from JSON file, returning an empty database if the file doesn't exist.
    pub async fn load(path: &Path) -> Result<Self> {
        match tokio::fs::read_to_string(path).await {
            Ok(buf) => Ok(serde_json::from_str(&buf)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Database::default()),
            Err(e) => Err(Error::transport(&format!("reading {}", path.display()), e)),
        }
    }

    /// Save database to JSON file using atomic write (temp file + rename).
    pub async fn save(&self, path: &Path) -> Result<()> {
        let tmp = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| Error::transport(&format!("creating {}", dir.display()), e))?;
        }
        tokio::fs::write(&tmp, data)
            .await
            .map_err(|e| Error::transport(&format!("writing {}", tmp.display()), e))?;
        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| Error::transport(&format!("replacing {}", path.display()), e))?;
        Ok(())
    }

    fn records(&self, collection: &str) -> &[Record] {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    db: Mutex<Database>,
}

impl JsonFileBackend {
    /// Open the store at `path`; a missing file is an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let db = Database::load(&path).await?;
        debug!(path = %path.display(), "opened JSON file store");
        Ok(JsonFileBackend {
            path,
            db: Mutex::new(db),
        })
    }

    /// Apply `f` to a copy of the document, persist it, then swap it in.
    async fn write<T>(&self, f: impl FnOnce(&mut Database) -> Result<T>) -> Result<T> {
        let mut guard = self.db.lock().await;
        let mut next = guard.clone();
        let out = f(&mut next)?;
        if let Err(e) = next.save(&self.path).await {
            warn!(path = %self.path.display(), error = %e, "write failed, store unchanged");
            return Err(e);
        }
        *guard = next;
        Ok(out)
    }
}

impl RecordStore for JsonFileBackend {
    fn naming(&self) -> FieldNaming {
        FieldNaming::SnakeCase
    }

    async fn list(&self, collection: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        let guard = self.db.lock().await;
        Ok(guard
            .records(collection)
            .iter()
            .filter(|r| filter.matches(&r.fields))
            .cloned()
            .collect())
    }

    async fn get(&self, collection: &str, id: u64) -> Result<Record> {
        let guard = self.db.lock().await;
        guard
            .records(collection)
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or_else(|| Error::not_found(collection, id))
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Record> {
        validate_fields(&fields)?;
        self.write(|db| {
            let records = db.collections.entry(collection.to_string()).or_default();
            let record = Record {
                id: next_id(records),
                fields,
            };
            records.push(record.clone());
            Ok(record)
        })
        .await
    }

    async fn update(&self, collection: &str, id: u64, fields: Fields) -> Result<Record> {
        validate_fields(&fields)?;
        self.write(|db| {
            let record = db
                .collections
                .get_mut(collection)
                .and_then(|records| records.iter_mut().find(|r| r.id == id))
                .ok_or_else(|| Error::not_found(collection, id))?;
            record.fields.extend(fields);
            Ok(record.clone())
        })
        .await
    }

    async fn delete(&self, collection: &str, id: u64) -> Result<Record> {
        self.write(|db| {
            let records = db
                .collections
                .get_mut(collection)
                .ok_or_else(|| Error::not_found(collection, id))?;
            let idx = records
                .iter()
                .position(|r| r.id == id)
                .ok_or_else(|| Error::not_found(collection, id))?;
            Ok(records.remove(idx))
        })
        .await
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
    async fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = JsonFileBackend::open(dir.path().join("board.json")).await.unwrap();
        assert!(store.list("tasks", &RecordFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        {
            let store = JsonFileBackend::open(&path).await.unwrap();
            store
                .create("tasks", fields(json!({"title": "a", "category_id": "work"})))
                .await
                .unwrap();
            store
                .update("tasks", 1, fields(json!({"completed": true})))
                .await
                .unwrap();
        }
        let store = JsonFileBackend::open(&path).await.unwrap();
        let rec = store.get("tasks", 1).await.unwrap();
        assert_eq!(rec.fields["category_id"], "work");
        assert_eq!(rec.fields["completed"], true);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn failed_delete_leaves_file_untouched() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        let store = JsonFileBackend::open(&path).await.unwrap();
        store.create("tasks", fields(json!({"title": "a"}))).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let err = store.delete("tasks", 9).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 9, .. }));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("board.json");
        std::fs::write(&path, "{not json").unwrap();
        let err = JsonFileBackend::open(&path).await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
