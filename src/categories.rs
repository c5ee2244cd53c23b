//! Category store: CRUD over the `categories` collection.

use std::sync::Arc;

use tracing::info;

use crate::category::{Category, CategoryPatch, NewCategory};
use crate::codec::{changed_fields, Codec};
use crate::error::{Error, Result};
use crate::events::{ChangeKind, EventBus};
use crate::record::{RecordFilter, RecordStore, CATEGORIES};

pub struct CategoryStore<S> {
    backend: Arc<S>,
    events: EventBus,
}

impl<S: RecordStore> CategoryStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self::with_events(backend, EventBus::default())
    }

    pub fn with_events(backend: Arc<S>, events: EventBus) -> Self {
        CategoryStore { backend, events }
    }

    fn codec(&self) -> Codec {
        Codec::categories(self.backend.naming())
    }

    /// All categories sorted by `order` (ties keep insertion order).
    pub async fn all(&self) -> Result<Vec<Category>> {
        let records = self.backend.list(CATEGORIES, &RecordFilter::all()).await?;
        let mut categories: Vec<Category> = self.codec().decode_all(records)?;
        categories.sort_by_key(|c| c.order);
        Ok(categories)
    }

    pub async fn get(&self, id: u64) -> Result<Category> {
        let record = self.backend.get(CATEGORIES, id).await?;
        self.codec().decode(record)
    }

    /// Create a category. The key is derived from the name and must be unique;
    /// `order` defaults to one past the current maximum.
    pub async fn create(&self, new: NewCategory) -> Result<Category> {
        let existing = self.all().await?;
        let order = existing.iter().map(|c| c.order).max().unwrap_or(0) + 1;
        let category = new.into_category(0, order);
        if category.key.is_empty() {
            return Err(Error::Validation("category name cannot be empty".into()));
        }
        if existing.iter().any(|c| c.key == category.key) {
            return Err(Error::Validation(format!(
                "a category with key '{}' already exists",
                category.key
            )));
        }
        let fields = self.codec().encode(&category)?;
        let record = self.backend.create(CATEGORIES, fields).await?;
        let created: Category = self.codec().decode(record)?;
        info!(id = created.id, key = %created.key, "category created");
        self.events.publish(ChangeKind::CategoryCreated, created.id);
        Ok(created)
    }

    /// Rename, recolor or reorder. The key never changes, so tasks keep
    /// matching after a rename.
    pub async fn update(&self, id: u64, patch: CategoryPatch) -> Result<Category> {
        let codec = self.codec();
        let current = self.get(id).await?;
        let merged = patch.apply(&current);
        if merged.name.is_empty() {
            return Err(Error::Validation("category name cannot be empty".into()));
        }
        let changes = changed_fields(&codec.encode(&current)?, &codec.encode(&merged)?);
        if changes.is_empty() {
            return Ok(current);
        }
        let record = self.backend.update(CATEGORIES, id, changes).await?;
        let updated: Category = codec.decode(record)?;
        info!(id, name = %updated.name, "category updated");
        self.events.publish(ChangeKind::CategoryUpdated, id);
        Ok(updated)
    }

    /// Delete a category. Tasks referencing its key are left as they are.
    pub async fn delete(&self, id: u64) -> Result<Category> {
        let record = self.backend.delete(CATEGORIES, id).await?;
        let deleted: Category = self.codec().decode(record)?;
        info!(id, key = %deleted.key, "category deleted");
        self.events.publish(ChangeKind::CategoryDeleted, id);
        Ok(deleted)
    }
}
