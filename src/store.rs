//! Task store: the single source of truth for tasks.
//!
//! Wraps a [`RecordStore`] backend, translating through [`Codec`] so callers
//! only ever see canonical [`Task`] values. Every mutation is a single
//! backend call; the merged record is validated before anything is written.

use std::sync::Arc;

use chrono::{Local, Utc};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::category::normalise_key;
use crate::codec::{changed_fields, Codec};
use crate::error::{Error, Result};
use crate::events::{ChangeEvent, ChangeKind, EventBus};
use crate::record::{Condition, RecordFilter, RecordStore, TASKS};
use crate::stats::{aggregate, Stats};
use crate::task::{NewTask, Task, TaskPatch};

pub struct TaskStore<S> {
    backend: Arc<S>,
    events: EventBus,
}

impl<S: RecordStore> TaskStore<S> {
    pub fn new(backend: Arc<S>) -> Self {
        Self::with_events(backend, EventBus::default())
    }

    /// Share an event bus with other stores over the same backend.
    pub fn with_events(backend: Arc<S>, events: EventBus) -> Self {
        TaskStore { backend, events }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.events.subscribe()
    }

    fn codec(&self) -> Codec {
        Codec::tasks(self.backend.naming())
    }

    /// Canonical field name → backend field name.
    fn field(&self, canonical: &str) -> String {
        self.codec().field(canonical)
    }

    async fn fetch(&self, filter: RecordFilter) -> Result<Vec<Task>> {
        let records = self.backend.list(TASKS, &filter).await?;
        self.codec().decode_all(records)
    }

    fn not_archived(&self) -> RecordFilter {
        RecordFilter::all().eq(self.field("archived"), false)
    }

    /// Create a task with defaults applied; the backend assigns the id.
    pub async fn create(&self, new: NewTask) -> Result<Task> {
        let task = new.into_task(0, Utc::now());
        validate(&task)?;
        let fields = self.codec().encode(&task)?;
        let record = self.backend.create(TASKS, fields).await?;
        let created: Task = self.codec().decode(record)?;
        info!(id = created.id, title = %created.title, "task created");
        self.events.publish(ChangeKind::TaskCreated, created.id);
        Ok(created)
    }

    pub async fn get(&self, id: u64) -> Result<Task> {
        let record = self.backend.get(TASKS, id).await?;
        self.codec().decode(record)
    }

    /// Merge `patch` over the stored task. Writes only the fields that change.
    pub async fn update(&self, id: u64, patch: TaskPatch) -> Result<Task> {
        self.apply(id, &patch, ChangeKind::TaskUpdated).await
    }

    pub async fn archive(&self, id: u64) -> Result<Task> {
        self.apply(id, &TaskPatch::archived(true), ChangeKind::TaskArchived)
            .await
    }

    pub async fn unarchive(&self, id: u64) -> Result<Task> {
        self.apply(id, &TaskPatch::archived(false), ChangeKind::TaskUnarchived)
            .await
    }

    /// Flip completion, stamping or clearing `completedAt`.
    pub async fn toggle_complete(&self, id: u64) -> Result<Task> {
        let current = self.get(id).await?;
        self.update(id, TaskPatch::completed(!current.completed)).await
    }

    /// Remove a task from any state; returns the removed record.
    pub async fn delete(&self, id: u64) -> Result<Task> {
        let record = self.backend.delete(TASKS, id).await?;
        let deleted: Task = self.codec().decode(record)?;
        info!(id, "task deleted");
        self.events.publish(ChangeKind::TaskDeleted, id);
        Ok(deleted)
    }

    /// Every task, archived included, in insertion order.
    pub async fn list(&self) -> Result<Vec<Task>> {
        self.fetch(RecordFilter::all()).await
    }

    /// Non-archived tasks referencing a category key.
    pub async fn list_by_category(&self, key: &str) -> Result<Vec<Task>> {
        let filter = self
            .not_archived()
            .eq(self.field("categoryId"), normalise_key(key));
        self.fetch(filter).await
    }

    /// Non-archived, not completed.
    pub async fn list_active(&self) -> Result<Vec<Task>> {
        self.fetch(self.not_archived().eq(self.field("completed"), false))
            .await
    }

    /// Non-archived, completed.
    pub async fn list_completed(&self) -> Result<Vec<Task>> {
        self.fetch(self.not_archived().eq(self.field("completed"), true))
            .await
    }

    pub async fn list_archived(&self) -> Result<Vec<Task>> {
        self.fetch(RecordFilter::all().eq(self.field("archived"), true))
            .await
    }

    /// Non-archived tasks whose title or description contains `text`,
    /// case-insensitively. Empty text matches every non-archived task.
    pub async fn search(&self, text: &str) -> Result<Vec<Task>> {
        let text = text.trim();
        let mut filter = self.not_archived();
        if !text.is_empty() {
            filter = filter.any_of(vec![
                Condition::Contains(self.field("title"), text.to_string()),
                Condition::Contains(self.field("description"), text.to_string()),
            ]);
        }
        self.fetch(filter).await
    }

    /// Aggregate statistics over the current snapshot.
    pub async fn stats(&self) -> Result<Stats> {
        let tasks = self.list().await?;
        Ok(aggregate(&tasks, Local::now().date_naive()))
    }

    async fn apply(&self, id: u64, patch: &TaskPatch, kind: ChangeKind) -> Result<Task> {
        let codec = self.codec();
        let current = self.get(id).await?;
        let merged = patch.apply(&current, Utc::now());
        validate(&merged)?;

        let changes = changed_fields(&codec.encode(&current)?, &codec.encode(&merged)?);
        if changes.is_empty() {
            debug!(id, "update is a no-op");
            return Ok(current);
        }
        let record = self.backend.update(TASKS, id, changes).await?;
        let updated: Task = codec.decode(record)?;
        debug!(id, ?kind, "task updated");
        self.events.publish(kind, id);
        Ok(updated)
    }
}

fn validate(task: &Task) -> Result<()> {
    if task.title.trim().is_empty() {
        return Err(Error::Validation("task title cannot be empty".into()));
    }
    Ok(())
}
