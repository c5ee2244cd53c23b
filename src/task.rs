//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct, the field set accepted when
//! creating one (`NewTask`) and the partial update applied by the store
//! (`TaskPatch`).

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::category::normalise_key;
use crate::fields::Priority;

/// Category key assigned to tasks created without one.
pub const DEFAULT_CATEGORY: &str = "general";

/// A to-do item with completion and archive state.
///
/// Serialized with camelCase field names; this is the canonical naming the
/// rest of the crate works with. Backends may use another convention, see
/// [`crate::codec`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category")]
    pub category_id: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub archived: bool,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl Task {
    /// Due date as a calendar date in the local time zone.
    pub fn due_local_date(&self) -> Option<NaiveDate> {
        self.due_date.as_ref().map(local_date)
    }

    /// Completion timestamp as a calendar date in the local time zone.
    pub fn completed_local_date(&self) -> Option<NaiveDate> {
        self.completed_at.as_ref().map(local_date)
    }

    /// Active tasks are the ones every non-archive view shows.
    pub fn is_active(&self) -> bool {
        !self.archived
    }
}

/// Calendar date of a timestamp in the evaluating machine's time zone.
pub fn local_date(ts: &DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Fields accepted by `TaskStore::create`. Everything but the title is optional.
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<DateTime<Utc>>,
}

impl NewTask {
    pub fn titled(title: impl Into<String>) -> Self {
        NewTask {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category_id = Some(category.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due(mut self, due: DateTime<Utc>) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the full record for a freshly assigned id.
    pub(crate) fn into_task(self, id: u64, now: DateTime<Utc>) -> Task {
        Task {
            id,
            title: self.title.trim().to_string(),
            description: self.description.unwrap_or_default(),
            category_id: self
                .category_id
                .map(|c| normalise_key(&c))
                .filter(|c| !c.is_empty())
                .unwrap_or_else(default_category),
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
            completed: false,
            completed_at: None,
            created_at: now,
            archived: false,
        }
    }
}

/// Partial update. `None` leaves a field untouched; `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub completed: Option<bool>,
    pub archived: Option<bool>,
}

impl TaskPatch {
    pub fn completed(completed: bool) -> Self {
        TaskPatch {
            completed: Some(completed),
            ..Default::default()
        }
    }

    pub fn archived(archived: bool) -> Self {
        TaskPatch {
            archived: Some(archived),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }

    /// Merge this patch over `task`, producing the updated record.
    ///
    /// `completedAt` follows `completed`: stamped with `now` on a false→true
    /// transition, cleared whenever the result is not completed.
    pub fn apply(&self, task: &Task, now: DateTime<Utc>) -> Task {
        let mut out = task.clone();
        if let Some(title) = &self.title {
            out.title = title.trim().to_string();
        }
        if let Some(description) = &self.description {
            out.description = description.clone();
        }
        if let Some(category) = &self.category_id {
            out.category_id = normalise_key(category);
        }
        if let Some(priority) = self.priority {
            out.priority = priority;
        }
        if let Some(due) = self.due_date {
            out.due_date = due;
        }
        if let Some(completed) = self.completed {
            out.completed = completed;
            out.completed_at = match (task.completed, completed) {
                (false, true) => Some(now),
                (true, true) => task.completed_at.or(Some(now)),
                (_, false) => None,
            };
        }
        if let Some(archived) = self.archived {
            out.archived = archived;
        }
        out
    }
}
