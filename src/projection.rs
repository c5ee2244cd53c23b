//! Category projection: per-category counts of active tasks for the sidebar.

use std::collections::BTreeMap;

use crate::category::{normalise_key, Category};
use crate::task::Task;

/// Map each category key to the number of non-archived tasks referencing it.
/// Every category appears, with 0 when nothing matches. Both sides are
/// normalized before comparison.
pub fn project_counts(tasks: &[Task], categories: &[Category]) -> BTreeMap<String, usize> {
    let mut counts: BTreeMap<String, usize> = categories
        .iter()
        .map(|c| (normalise_key(&c.key), 0))
        .collect();
    for t in tasks.iter().filter(|t| t.is_active()) {
        if let Some(n) = counts.get_mut(&normalise_key(&t.category_id)) {
            *n += 1;
        }
    }
    counts
}

/// Categories with `task_count` filled in from `tasks`.
pub fn with_counts(categories: &[Category], tasks: &[Task]) -> Vec<Category> {
    let counts = project_counts(tasks, categories);
    categories
        .iter()
        .map(|c| Category {
            task_count: counts.get(&normalise_key(&c.key)).copied().unwrap_or(0),
            ..c.clone()
        })
        .collect()
}

/// Sum of the projected counts, shown against "All Tasks".
pub fn total_active(counts: &BTreeMap<String, usize>) -> usize {
    counts.values().sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::NewCategory;
    use crate::task::NewTask;
    use chrono::Utc;

    fn task(id: u64, category: &str, archived: bool) -> Task {
        let mut t = NewTask::titled("t").into_task(id, Utc::now());
        t.category_id = category.to_string();
        t.archived = archived;
        t
    }

    fn categories() -> Vec<Category> {
        vec![
            NewCategory::named("Work").into_category(1, 1),
            NewCategory::named("Personal").into_category(2, 2),
            NewCategory::named("Health").into_category(3, 3),
        ]
    }

    #[test]
    fn counts_active_tasks_per_category() {
        let tasks = vec![
            task(1, "work", false),
            task(2, "Work", false),
            task(3, "personal", false),
            task(4, "work", true),
            task(5, "unknown", false),
        ];
        let counts = project_counts(&tasks, &categories());
        assert_eq!(counts["work"], 2);
        assert_eq!(counts["personal"], 1);
        assert_eq!(counts["health"], 0);
        assert_eq!(counts.len(), 3);
        assert_eq!(total_active(&counts), 3);
    }

    #[test]
    fn renamed_category_keeps_its_count() {
        let mut cats = categories();
        cats[0].name = "Office".into();
        let filled = with_counts(&cats, &[task(1, "work", false)]);
        assert_eq!(filled[0].name, "Office");
        assert_eq!(filled[0].task_count, 1);
        assert_eq!(filled[1].task_count, 0);
    }
}
