//! Record store backends.

pub mod file;
pub mod memory;

pub use file::JsonFileBackend;
pub use memory::MemoryBackend;

use crate::error::Result;
use crate::record::{FieldNaming, Fields, Record, RecordFilter, RecordStore};

/// The backend selected at startup.
#[derive(Debug)]
pub enum Backend {
    Memory(MemoryBackend),
    File(JsonFileBackend),
}

impl RecordStore for Backend {
    fn naming(&self) -> FieldNaming {
        match self {
            Backend::Memory(b) => b.naming(),
            Backend::File(b) => b.naming(),
        }
    }

    async fn list(&self, collection: &str, filter: &RecordFilter) -> Result<Vec<Record>> {
        match self {
            Backend::Memory(b) => b.list(collection, filter).await,
            Backend::File(b) => b.list(collection, filter).await,
        }
    }

    async fn get(&self, collection: &str, id: u64) -> Result<Record> {
        match self {
            Backend::Memory(b) => b.get(collection, id).await,
            Backend::File(b) => b.get(collection, id).await,
        }
    }

    async fn create(&self, collection: &str, fields: Fields) -> Result<Record> {
        match self {
            Backend::Memory(b) => b.create(collection, fields).await,
            Backend::File(b) => b.create(collection, fields).await,
        }
    }

    async fn update(&self, collection: &str, id: u64, fields: Fields) -> Result<Record> {
        match self {
            Backend::Memory(b) => b.update(collection, id, fields).await,
            Backend::File(b) => b.update(collection, id, fields).await,
        }
    }

    async fn delete(&self, collection: &str, id: u64) -> Result<Record> {
        match self {
            Backend::Memory(b) => b.delete(collection, id).await,
            Backend::File(b) => b.delete(collection, id).await,
        }
    }
}
