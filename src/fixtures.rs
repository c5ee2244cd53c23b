//! Seed data for the in-memory backend.
//!
//! Fixture files are embedded at build time and hold canonical (camelCase)
//! records with explicit ids, which are preserved.

use std::collections::BTreeMap;

use crate::backend::MemoryBackend;
use crate::category::Category;
use crate::codec::Codec;
use crate::error::Result;
use crate::record::{FieldNaming, Record, CATEGORIES, TASKS};
use crate::task::Task;

const TASKS_JSON: &str = include_str!("../fixtures/tasks.json");
const CATEGORIES_JSON: &str = include_str!("../fixtures/categories.json");

pub fn seed_tasks() -> Result<Vec<Task>> {
    Ok(serde_json::from_str(TASKS_JSON)?)
}

pub fn seed_categories() -> Result<Vec<Category>> {
    Ok(serde_json::from_str(CATEGORIES_JSON)?)
}

/// An in-memory backend holding the fixture tasks and categories.
pub fn seeded_backend() -> Result<MemoryBackend> {
    let naming = FieldNaming::Canonical;
    let tasks = Codec::tasks(naming);
    let categories = Codec::categories(naming);

    let mut collections = BTreeMap::new();
    collections.insert(
        TASKS.to_string(),
        seed_tasks()?
            .iter()
            .map(|t| Ok(Record { id: t.id, fields: tasks.encode(t)? }))
            .collect::<Result<Vec<_>>>()?,
    );
    collections.insert(
        CATEGORIES.to_string(),
        seed_categories()?
            .iter()
            .map(|c| Ok(Record { id: c.id, fields: categories.encode(c)? }))
            .collect::<Result<Vec<_>>>()?,
    );
    Ok(MemoryBackend::from_records(collections))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{RecordFilter, RecordStore};
    use std::collections::HashSet;

    #[test]
    fn fixtures_parse_and_hold_the_completion_invariant() {
        let tasks = seed_tasks().unwrap();
        assert!(!tasks.is_empty());
        for t in &tasks {
            assert!(!t.title.is_empty());
            assert_eq!(t.completed, t.completed_at.is_some(), "task {}", t.id);
        }
        let ids: HashSet<_> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), tasks.len());
    }

    #[test]
    fn every_category_key_is_normalised() {
        for c in seed_categories().unwrap() {
            assert_eq!(c.key, crate::category::normalise_key(&c.name));
        }
    }

    #[tokio::test]
    async fn seeded_backend_keeps_ids_and_continues_numbering() {
        let backend = seeded_backend().unwrap();
        let n = seed_tasks().unwrap().len() as u64;
        let rec = backend.get(TASKS, n).await.unwrap();
        assert_eq!(rec.id, n);
        let all = backend.list(TASKS, &RecordFilter::all()).await.unwrap();
        assert_eq!(all.len() as u64, n);
        let created = backend
            .create(TASKS, serde_json::Map::new())
            .await
            .unwrap();
        assert_eq!(created.id, n + 1);
    }
}
