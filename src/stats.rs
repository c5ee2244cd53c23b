//! Aggregate statistics over a task snapshot.
//!
//! All functions here ignore archived tasks and take `today` as the local
//! calendar date so callers decide what "today" means.

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

use crate::fields::Priority;
use crate::task::Task;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Rounded integer percentage; 0 for an empty set.
    pub completion_rate: u32,
    pub today_completed: usize,
}

/// Counts, completion rate and same-day completions over non-archived tasks.
pub fn aggregate(tasks: &[Task], today: NaiveDate) -> Stats {
    let active: Vec<&Task> = tasks.iter().filter(|t| t.is_active()).collect();
    let total = active.len();
    let completed = active.iter().filter(|t| t.completed).count();
    let today_completed = active
        .iter()
        .filter(|t| t.completed && t.completed_local_date() == Some(today))
        .count();
    Stats {
        total,
        completed,
        pending: total - completed,
        completion_rate: percentage(completed, total),
        today_completed,
    }
}

/// `part / whole * 100`, rounded half away from zero; 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Start and end dates of the ISO week (Monday to Sunday) containing `today`.
pub fn week_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayCount {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub completed: usize,
    pub is_today: bool,
}

/// Completions per day for the Monday–Sunday week containing `today`.
pub fn weekly_completions(tasks: &[Task], today: NaiveDate) -> Vec<DayCount> {
    let counts = completions_by_day(tasks);
    let (start, _) = week_bounds(today);
    (0..7)
        .map(|offset| {
            let date = start + Duration::days(offset);
            DayCount {
                date,
                weekday: date.weekday(),
                completed: counts.get(&date).copied().unwrap_or(0),
                is_today: date == today,
            }
        })
        .collect()
}

fn completions_by_day(tasks: &[Task]) -> BTreeMap<NaiveDate, usize> {
    let mut counts = BTreeMap::new();
    for t in tasks.iter().filter(|t| t.is_active() && t.completed) {
        if let Some(d) = t.completed_local_date() {
            *counts.entry(d).or_insert(0) += 1;
        }
    }
    counts
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
    pub percentage: u32,
}

/// Count and share of non-archived tasks per priority, high first.
pub fn priority_breakdown(tasks: &[Task]) -> Vec<PriorityCount> {
    let active: Vec<&Task> = tasks.iter().filter(|t| t.is_active()).collect();
    Priority::ALL
        .iter()
        .map(|&priority| {
            let count = active.iter().filter(|t| t.priority == priority).count();
            PriorityCount {
                priority,
                count,
                percentage: percentage(count, active.len()),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    /// Consecutive days with at least one completion, ending today, or
    /// yesterday when nothing has been completed yet today.
    pub streak_days: u32,
    /// Mean days from creation to completion.
    pub avg_days_to_complete: Option<f64>,
    /// Weekday with the most completions; earliest weekday wins ties.
    pub most_productive_day: Option<Weekday>,
}

pub fn insights(tasks: &[Task], today: NaiveDate) -> Insights {
    let by_day = completions_by_day(tasks);
    let days: HashSet<NaiveDate> = by_day.keys().copied().collect();

    let mut cursor = if days.contains(&today) {
        today
    } else {
        today - Duration::days(1)
    };
    let mut streak_days = 0;
    while days.contains(&cursor) {
        streak_days += 1;
        cursor -= Duration::days(1);
    }

    let durations: Vec<f64> = tasks
        .iter()
        .filter(|t| t.is_active() && t.completed)
        .filter_map(|t| t.completed_at.map(|done| done - t.created_at))
        .map(|d| d.num_seconds() as f64 / 86_400.0)
        .collect();
    let avg_days_to_complete = if durations.is_empty() {
        None
    } else {
        Some(durations.iter().sum::<f64>() / durations.len() as f64)
    };

    let mut per_weekday = [0usize; 7];
    for (date, n) in &by_day {
        per_weekday[date.weekday().num_days_from_monday() as usize] += n;
    }
    let most_productive_day = per_weekday
        .iter()
        .enumerate()
        .filter(|(_, &n)| n > 0)
        .fold(None, |best: Option<(usize, usize)>, (i, &n)| match best {
            Some((_, m)) if m >= n => best,
            _ => Some((i, n)),
        })
        .map(|(i, _)| WEEK[i]);

    Insights {
        streak_days,
        avg_days_to_complete,
        most_productive_day,
    }
}
