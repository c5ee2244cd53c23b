//! Enumerations and field types for task management.
//!
//! This module defines the structured data types used to classify and filter tasks:
//! priority levels, due-date buckets and the sidebar's quick views.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Priority classification for task importance.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    Serialize,
    Deserialize,
    ValueEnum,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    #[serde(alias = "Low")]
    Low,
    #[default]
    #[serde(alias = "Medium")]
    Medium,
    #[serde(alias = "High")]
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Display label, e.g. "High".
    pub fn label(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

/// Filtering options for tasks based on due dates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum DueBucket {
    Today,
    ThisWeek,
    Overdue,
    #[value(name = "none")]
    NoDate,
}

/// Sidebar quick views. `Category` carries a category key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickView {
    All,
    Today,
    HighPriority,
    Completed,
    Category(String),
}

impl QuickView {
    /// Parse a sidebar view id: `all`, `today`, `high-priority`, `completed`,
    /// anything else is treated as a category key.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => QuickView::All,
            "today" => QuickView::Today,
            "high-priority" => QuickView::HighPriority,
            "completed" => QuickView::Completed,
            other => QuickView::Category(other.to_string()),
        }
    }

    pub fn title(&self) -> String {
        match self {
            QuickView::All => "All Tasks".into(),
            QuickView::Today => "Due Today".into(),
            QuickView::HighPriority => "High Priority".into(),
            QuickView::Completed => "Completed Tasks".into(),
            QuickView::Category(key) => {
                let mut chars = key.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Priority::High).unwrap(), "\"high\"");
        let p: Priority = serde_json::from_str("\"Low\"").unwrap();
        assert_eq!(p, Priority::Low);
    }

    #[test]
    fn quick_view_parse_and_title() {
        assert_eq!(QuickView::parse("all"), QuickView::All);
        assert_eq!(QuickView::parse("High-Priority"), QuickView::HighPriority);
        assert_eq!(QuickView::parse("Work"), QuickView::Category("work".into()));
        assert_eq!(QuickView::parse("work").title(), "Work");
        assert_eq!(QuickView::Today.title(), "Due Today");
    }
}
