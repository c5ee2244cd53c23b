//! Parsing and plain-text rendering helpers for the CLI.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, TimeZone, Utc, Weekday};

use crate::category::Category;
use crate::error::{Error, Result};
use crate::stats::{DayCount, Insights, PriorityCount, Stats};
use crate::task::Task;

/// Parse human-readable due date input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - weekday names ("fri", "next monday"), always a future or current day
/// - "eow" / "end of week" (Sunday)
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD"
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "eow" | "end of week" => {
            let back = today.weekday().num_days_from_monday() as i64;
            return Some(today + Duration::days(6 - back));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        if let Some(n) = rest.strip_suffix('d').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::days(n));
        }
        if let Some(n) = rest.strip_suffix('w').and_then(|n| n.trim().parse::<i64>().ok()) {
            return Some(today + Duration::weeks(n));
        }
    }

    let (skip_week, name) = match s.strip_prefix("next ") {
        Some(rest) => (true, rest),
        None => (false, s.as_str()),
    };
    if let Ok(target) = name.parse::<Weekday>() {
        let current = today.weekday().num_days_from_monday() as i64;
        let wanted = target.num_days_from_monday() as i64;
        let mut ahead = (wanted - current).rem_euclid(7);
        if skip_week {
            ahead += 7;
        }
        return Some(today + Duration::days(ahead));
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Parse a due date argument into local midnight, as UTC.
pub fn parse_due(s: &str) -> Result<DateTime<Utc>> {
    let today = Local::now().date_naive();
    let date = parse_due_input(s, today)
        .ok_or_else(|| Error::InvalidArgument(format!("unrecognised due date '{s}'")))?;
    local_midnight(date)
}

fn local_midnight(date: NaiveDate) -> Result<DateTime<Utc>> {
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| Error::InvalidArgument(format!("invalid date {date}")))?;
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| Error::InvalidArgument(format!("{date} has no local midnight")))
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => match (d - today).num_days() {
            0 => "today".into(),
            1 => "tomorrow".into(),
            n if n > 1 => format!("in {n}d"),
            n => format!("{}d late", -n),
        },
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        return s.to_string();
    }
    let mut out: String = s.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// Print tasks as a table.
pub fn print_table(tasks: &[Task], today: NaiveDate) {
    println!(
        "{:<5} {:<4} {:<7} {:<10} {:<12} {}",
        "ID", "Done", "Pri", "Due", "Category", "Title"
    );
    for t in tasks {
        let done = if t.completed { "[x]" } else { "[ ]" };
        let archived = if t.archived { " (archived)" } else { "" };
        println!(
            "{:<5} {:<4} {:<7} {:<10} {:<12} {}{}",
            t.id,
            done,
            t.priority.label(),
            format_due_relative(t.due_local_date(), today),
            truncate(&t.category_id, 12),
            t.title,
            archived
        );
    }
}

/// Print every field of a single task.
pub fn print_task(t: &Task, today: NaiveDate) {
    let stamp = |ts: Option<DateTime<Utc>>| {
        ts.map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".into())
    };
    println!("ID:           {}", t.id);
    println!("Title:        {}", t.title);
    println!("Category:     {}", t.category_id);
    println!("Priority:     {}", t.priority.label());
    println!(
        "Due:          {}",
        match t.due_local_date() {
            Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
            None => "-".into(),
        }
    );
    println!("Completed:    {}", if t.completed { "yes" } else { "no" });
    println!("Completed at: {}", stamp(t.completed_at));
    println!("Archived:     {}", if t.archived { "yes" } else { "no" });
    println!("Created:      {}", stamp(Some(t.created_at)));
    if !t.description.is_empty() {
        println!("Description:\n{}", t.description);
    }
}

pub fn print_stats(s: &Stats) {
    println!("Total:          {}", s.total);
    println!("Completed:      {}", s.completed);
    println!("Pending:        {}", s.pending);
    println!("Completion:     {}%", s.completion_rate);
    println!("Done today:     {}", s.today_completed);
}

pub fn print_week(days: &[DayCount]) {
    println!("\nThis week:");
    for d in days {
        let marker = if d.is_today { " <- today" } else { "" };
        println!(
            "  {:<4} {:>3} {}{}",
            d.weekday.to_string(),
            d.completed,
            "#".repeat(d.completed),
            marker
        );
    }
}

pub fn print_priorities(rows: &[PriorityCount]) {
    println!("\nBy priority:");
    for r in rows {
        println!("  {:<7} {:>3} ({}%)", r.priority.label(), r.count, r.percentage);
    }
}

pub fn print_insights(i: &Insights) {
    println!("\nInsights:");
    println!("  Current streak:     {} days", i.streak_days);
    match i.avg_days_to_complete {
        Some(avg) => println!("  Time to complete:   {avg:.1} days"),
        None => println!("  Time to complete:   -"),
    }
    match i.most_productive_day {
        Some(day) => println!("  Most productive:    {day}"),
        None => println!("  Most productive:    -"),
    }
}

pub fn print_categories(categories: &[Category]) {
    println!(
        "{:<5} {:<14} {:<14} {:<9} {:<10} {}",
        "ID", "Key", "Name", "Color", "Icon", "Tasks"
    );
    for c in categories {
        println!(
            "{:<5} {:<14} {:<14} {:<9} {:<10} {}",
            c.id,
            truncate(&c.key, 14),
            truncate(&c.name, 14),
            c.color,
            c.icon,
            c.task_count
        );
    }
}
