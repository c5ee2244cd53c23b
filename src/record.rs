//! The record store boundary.
//!
//! Backends store untyped JSON records per collection and know nothing about
//! tasks or categories. Field names inside a record follow the backend's
//! [`FieldNaming`]; translation to and from the canonical model lives in
//! [`crate::codec`].

use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Result;

pub const TASKS: &str = "tasks";
pub const CATEGORIES: &str = "categories";

/// Record fields, keyed by the backend's field names. Never contains the id.
pub type Fields = Map<String, Value>;

/// A stored record: backend-assigned id plus its fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: u64,
    pub fields: Fields,
}

/// Field name convention used by a backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldNaming {
    /// camelCase, the model's own names (`categoryId`).
    #[default]
    Canonical,
    /// snake_case (`category_id`).
    SnakeCase,
}

/// A single predicate over one field.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals(String, Value),
    /// Case-insensitive substring match on a string field.
    Contains(String, String),
    /// Any of the nested conditions holds.
    AnyOf(Vec<Condition>),
}

impl Condition {
    pub fn matches(&self, fields: &Fields) -> bool {
        match self {
            Condition::Equals(field, value) => fields.get(field).unwrap_or(&Value::Null) == value,
            Condition::Contains(field, needle) => fields
                .get(field)
                .and_then(Value::as_str)
                .map(|s| s.to_lowercase().contains(&needle.to_lowercase()))
                .unwrap_or(false),
            Condition::AnyOf(conds) => conds.iter().any(|c| c.matches(fields)),
        }
    }
}

/// Conjunction of conditions. An empty filter matches every record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordFilter {
    pub conditions: Vec<Condition>,
}

impl RecordFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push(Condition::Equals(field.into(), value.into()));
        self
    }

    pub fn contains(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.conditions.push(Condition::Contains(field.into(), text.into()));
        self
    }

    pub fn any_of(mut self, conditions: Vec<Condition>) -> Self {
        self.conditions.push(Condition::AnyOf(conditions));
        self
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        self.conditions.iter().all(|c| c.matches(fields))
    }
}

/// Asynchronous CRUD over collections of records.
///
/// Each call is one atomic unit of work against one collection. `create`
/// assigns the next integer id (max existing + 1, or 1 when empty).
/// `update` merges the given fields over the stored ones. A call that fails
/// leaves the collection unchanged.
pub trait RecordStore: Send + Sync {
    fn naming(&self) -> FieldNaming;

    fn list(
        &self,
        collection: &str,
        filter: &RecordFilter,
    ) -> impl Future<Output = Result<Vec<Record>>> + Send;

    fn get(&self, collection: &str, id: u64) -> impl Future<Output = Result<Record>> + Send;

    fn create(&self, collection: &str, fields: Fields)
        -> impl Future<Output = Result<Record>> + Send;

    fn update(
        &self,
        collection: &str,
        id: u64,
        fields: Fields,
    ) -> impl Future<Output = Result<Record>> + Send;

    fn delete(&self, collection: &str, id: u64) -> impl Future<Output = Result<Record>> + Send;
}

/// Next id for a collection: max existing + 1, or 1 when empty.
pub(crate) fn next_id(records: &[Record]) -> u64 {
    records.iter().map(|r| r.id).max().unwrap_or(0) + 1
}

/// Generic write validation shared by backends.
pub(crate) fn validate_fields(fields: &Fields) -> Result<()> {
    if fields.contains_key("id") {
        return Err(crate::Error::Validation("record id cannot be written".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(RecordFilter::all().matches(&fields(json!({"title": "x"}))));
    }

    #[test]
    fn conditions_are_anded() {
        let f = RecordFilter::all().eq("archived", false).contains("title", "BREAD");
        assert!(f.matches(&fields(json!({"title": "Buy bread", "archived": false}))));
        assert!(!f.matches(&fields(json!({"title": "Buy bread", "archived": true}))));
        assert!(!f.matches(&fields(json!({"title": "Walk dog", "archived": false}))));
    }

    #[test]
    fn any_of_is_ored() {
        let f = RecordFilter::all().any_of(vec![
            Condition::Contains("title".into(), "milk".into()),
            Condition::Contains("description".into(), "milk".into()),
        ]);
        assert!(f.matches(&fields(json!({"title": "Shop", "description": "milk, eggs"}))));
        assert!(!f.matches(&fields(json!({"title": "Shop", "description": "eggs"}))));
    }

    #[test]
    fn equals_null_matches_missing_field() {
        let f = RecordFilter::all().eq("dueDate", Value::Null);
        assert!(f.matches(&fields(json!({"title": "x"}))));
    }

    #[test]
    fn next_id_is_max_plus_one() {
        assert_eq!(next_id(&[]), 1);
        let recs = vec![
            Record { id: 4, fields: Fields::new() },
            Record { id: 2, fields: Fields::new() },
        ];
        assert_eq!(next_id(&recs), 5);
    }
}
