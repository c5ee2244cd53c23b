//! Translation between the canonical model and backend records.
//!
//! Every task and category field is listed once with its canonical
//! (camelCase) and snake_case name. Unknown record fields are dropped on
//! decode.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};
use crate::record::{FieldNaming, Fields, Record};

/// (canonical, snake_case) pairs for every persisted task field.
pub const TASK_FIELDS: &[(&str, &str)] = &[
    ("title", "title"),
    ("description", "description"),
    ("categoryId", "category_id"),
    ("priority", "priority"),
    ("dueDate", "due_date"),
    ("completed", "completed"),
    ("completedAt", "completed_at"),
    ("createdAt", "created_at"),
    ("archived", "archived"),
];

/// (canonical, snake_case) pairs for every persisted category field.
/// `taskCount` is derived and never stored.
pub const CATEGORY_FIELDS: &[(&str, &str)] = &[
    ("key", "key"),
    ("name", "name"),
    ("color", "color"),
    ("icon", "icon"),
    ("order", "order"),
];

/// Maps one entity's fields between the canonical model and a backend.
#[derive(Debug, Clone, Copy)]
pub struct Codec {
    naming: FieldNaming,
    table: &'static [(&'static str, &'static str)],
}

impl Codec {
    pub fn tasks(naming: FieldNaming) -> Self {
        Codec { naming, table: TASK_FIELDS }
    }

    pub fn categories(naming: FieldNaming) -> Self {
        Codec { naming, table: CATEGORY_FIELDS }
    }

    /// Backend name for a canonical field.
    pub fn field(&self, canonical: &str) -> String {
        self.table
            .iter()
            .find(|(c, _)| *c == canonical)
            .map(|(c, s)| match self.naming {
                FieldNaming::Canonical => c.to_string(),
                FieldNaming::SnakeCase => s.to_string(),
            })
            .unwrap_or_else(|| canonical.to_string())
    }

    fn canonical(&self, stored: &str) -> Option<&'static str> {
        self.table
            .iter()
            .find(|(c, s)| match self.naming {
                FieldNaming::Canonical => *c == stored,
                FieldNaming::SnakeCase => *s == stored,
            })
            .map(|(c, _)| *c)
    }

    /// Encode a model value into backend fields (id excluded).
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<Fields> {
        let Value::Object(map) = serde_json::to_value(value)? else {
            return Err(Error::Validation("record must be a JSON object".into()));
        };
        let mut out = Fields::new();
        for (canonical, _) in self.table {
            if let Some(v) = map.get(*canonical) {
                out.insert(self.field(canonical), v.clone());
            }
        }
        Ok(out)
    }

    /// Decode a backend record into a model value.
    pub fn decode<T: DeserializeOwned>(&self, record: Record) -> Result<T> {
        let mut map = Fields::new();
        for (stored, v) in record.fields {
            match self.canonical(&stored) {
                Some(canonical) => {
                    map.insert(canonical.to_string(), v);
                }
                None => trace!(field = %stored, id = record.id, "dropping unknown record field"),
            }
        }
        map.insert("id".to_string(), Value::from(record.id));
        Ok(serde_json::from_value(Value::Object(map))?)
    }

    pub fn decode_all<T: DeserializeOwned>(&self, records: Vec<Record>) -> Result<Vec<T>> {
        records.into_iter().map(|r| self.decode(r)).collect()
    }
}

/// Fields of `new` whose values differ from `old`. Removed fields become null.
pub fn changed_fields(old: &Fields, new: &Fields) -> Fields {
    let mut out = Fields::new();
    for (k, v) in new {
        if old.get(k) != Some(v) {
            out.insert(k.clone(), v.clone());
        }
    }
    for k in old.keys() {
        if !new.contains_key(k) {
            out.insert(k.clone(), Value::Null);
        }
    }
    out
}
