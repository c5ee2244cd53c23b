//! Category data structure.
//!
//! Categories are matched against `Task::category_id` by a stable `key`,
//! derived once from the display name when the category is created.

use serde::{Deserialize, Serialize};

pub const DEFAULT_COLOR: &str = "#5B47E0";
pub const DEFAULT_ICON: &str = "Folder";

/// A user-defined grouping label for tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub key: String,
    pub name: String,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_icon")]
    pub icon: String,
    #[serde(default)]
    pub order: u32,
    /// Derived by the category projection; never authoritative.
    #[serde(default)]
    pub task_count: usize,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Fields accepted by `CategoryStore::create`.
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub color: Option<String>,
    pub icon: Option<String>,
}

impl NewCategory {
    pub fn named(name: impl Into<String>) -> Self {
        NewCategory {
            name: name.into(),
            ..Default::default()
        }
    }

    pub(crate) fn into_category(self, id: u64, order: u32) -> Category {
        let name = self.name.trim().to_string();
        Category {
            id,
            key: normalise_key(&name),
            name,
            color: self.color.unwrap_or_else(default_color),
            icon: self.icon.unwrap_or_else(default_icon),
            order,
            task_count: 0,
        }
    }
}

/// Partial category update. `id` and `key` are not patchable.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub order: Option<u32>,
}

impl CategoryPatch {
    pub fn apply(&self, category: &Category) -> Category {
        let mut out = category.clone();
        if let Some(name) = &self.name {
            out.name = name.trim().to_string();
        }
        if let Some(color) = &self.color {
            out.color = color.clone();
        }
        if let Some(icon) = &self.icon {
            out.icon = icon.clone();
        }
        if let Some(order) = self.order {
            out.order = order;
        }
        out
    }
}

/// Normalize a category reference by trimming, lowercasing, and replacing
/// whitespace runs with single hyphens.
pub fn normalise_key(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalise_key() {
        assert_eq!(normalise_key("Work"), "work");
        assert_eq!(normalise_key("  Side   Project "), "side-project");
        assert_eq!(normalise_key("home"), "home");
        assert_eq!(normalise_key(""), "");
    }

    #[test]
    fn new_category_defaults() {
        let c = NewCategory::named(" Personal ").into_category(4, 2);
        assert_eq!(c.id, 4);
        assert_eq!(c.key, "personal");
        assert_eq!(c.name, "Personal");
        assert_eq!(c.color, DEFAULT_COLOR);
        assert_eq!(c.icon, DEFAULT_ICON);
        assert_eq!(c.order, 2);
        assert_eq!(c.task_count, 0);
    }

    #[test]
    fn rename_keeps_key() {
        let c = NewCategory::named("Work").into_category(1, 1);
        let renamed = CategoryPatch {
            name: Some("Office".into()),
            ..Default::default()
        }
        .apply(&c);
        assert_eq!(renamed.name, "Office");
        assert_eq!(renamed.key, "work");
    }
}
