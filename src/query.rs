//! Query engine: pure filtering over a task snapshot.
//!
//! Every predicate in a [`QuerySpec`] is ANDed. Setting both `completed`
//! and `priority` narrows to tasks matching both. Output keeps the input's
//! relative order.

use chrono::NaiveDate;

use crate::category::normalise_key;
use crate::fields::{DueBucket, Priority, QuickView};
use crate::stats::week_bounds;
use crate::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuerySpec {
    /// When false, archived tasks are dropped before any other predicate.
    pub include_archived: bool,
    pub category: Option<String>,
    pub due: Option<DueBucket>,
    pub priority: Option<Priority>,
    pub completed: Option<bool>,
    /// Case-insensitive substring over title or description. Blank is a no-op.
    pub search: Option<String>,
    /// Set when a quick view disagrees with an explicit filter on the same
    /// field. Nothing matches.
    pub unsatisfiable: bool,
}

impl QuerySpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// AND a sidebar quick view onto this spec. A view that contradicts an
    /// explicit filter leaves a spec that matches nothing.
    pub fn with_view(mut self, view: &QuickView) -> Self {
        let consistent = match view {
            QuickView::All => true,
            QuickView::Today => match self.due {
                // Today always falls inside this week.
                None | Some(DueBucket::Today) | Some(DueBucket::ThisWeek) => {
                    self.due = Some(DueBucket::Today);
                    true
                }
                Some(DueBucket::Overdue) | Some(DueBucket::NoDate) => false,
            },
            QuickView::HighPriority => narrow(&mut self.priority, Priority::High),
            QuickView::Completed => narrow(&mut self.completed, true),
            QuickView::Category(key) => match self.category {
                Some(ref own) => normalise_key(own) == normalise_key(key),
                None => {
                    self.category = Some(key.clone());
                    true
                }
            },
        };
        self.unsatisfiable |= !consistent;
        self
    }

    pub fn search(mut self, text: impl Into<String>) -> Self {
        self.search = Some(text.into());
        self
    }

    pub fn category(mut self, key: impl Into<String>) -> Self {
        self.category = Some(key.into());
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn due(mut self, bucket: DueBucket) -> Self {
        self.due = Some(bucket);
        self
    }

    pub fn include_archived(mut self, include: bool) -> Self {
        self.include_archived = include;
        self
    }

    /// True when `task` satisfies every predicate, with `today` as the local date.
    pub fn matches(&self, task: &Task, today: NaiveDate) -> bool {
        if self.unsatisfiable {
            return false;
        }
        if !self.include_archived && task.archived {
            return false;
        }
        if let Some(ref key) = self.category {
            if task.category_id != normalise_key(key) {
                return false;
            }
        }
        if let Some(bucket) = self.due {
            if !in_bucket(task.due_local_date(), bucket, today) {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(c) = self.completed {
            if task.completed != c {
                return false;
            }
        }
        if let Some(ref text) = self.search {
            let needle = text.trim().to_lowercase();
            if !needle.is_empty()
                && !task.title.to_lowercase().contains(&needle)
                && !task.description.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }
}

/// Set `slot` to `value` unless it already holds something else.
fn narrow<T: PartialEq>(slot: &mut Option<T>, value: T) -> bool {
    match slot {
        Some(own) => *own == value,
        None => {
            *slot = Some(value);
            true
        }
    }
}

fn in_bucket(due: Option<NaiveDate>, bucket: DueBucket, today: NaiveDate) -> bool {
    match (bucket, due) {
        (DueBucket::NoDate, d) => d.is_none(),
        (_, None) => false,
        (DueBucket::Today, Some(d)) => d == today,
        (DueBucket::ThisWeek, Some(d)) => {
            let (start, end) = week_bounds(today);
            d >= start && d <= end
        }
        (DueBucket::Overdue, Some(d)) => d < today,
    }
}

/// Tasks matching `spec`, in input order. Does not modify the input.
pub fn query(tasks: &[Task], spec: &QuerySpec, today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|t| spec.matches(t, today))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap() // a Wednesday
    }

    /// Local noon on `date`, as UTC.
    fn noon(date: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&date.and_hms_opt(12, 0, 0).unwrap())
            .single()
            .unwrap()
            .with_timezone(&Utc)
    }

    fn task(id: u64, title: &str) -> Task {
        NewTask::titled(title).into_task(id, noon(today()))
    }

    fn ids(tasks: &[Task]) -> Vec<u64> {
        tasks.iter().map(|t| t.id).collect()
    }

    fn sample() -> Vec<Task> {
        let mut bread = task(1, "Buy bread");
        bread.category_id = "home".into();
        bread.due_date = Some(noon(today()));

        let mut dog = task(2, "Walk dog");
        dog.priority = Priority::High;
        dog.description = "around the park".into();
        dog.due_date = Some(noon(today() - Duration::days(3)));

        let mut report = task(3, "Quarterly report");
        report.category_id = "work".into();
        report.priority = Priority::High;
        report.completed = true;
        report.completed_at = Some(noon(today()));
        report.due_date = Some(noon(today() + Duration::days(2)));

        let mut old = task(4, "Old bread recipe");
        old.archived = true;

        vec![bread, dog, report, old]
    }

    #[test]
    fn default_spec_drops_archived_only() {
        let out = query(&sample(), &QuerySpec::new(), today());
        assert_eq!(ids(&out), vec![1, 2, 3]);
        assert!(out.iter().all(|t| !t.archived));
    }

    #[test]
    fn include_archived_keeps_everything() {
        let out = query(&sample(), &QuerySpec::new().include_archived(true), today());
        assert_eq!(ids(&out), vec![1, 2, 3, 4]);
    }

    #[test]
    fn search_matches_title_or_description() {
        let tasks = sample();
        assert_eq!(ids(&query(&tasks, &QuerySpec::new().search("BREAD"), today())), vec![1]);
        assert_eq!(ids(&query(&tasks, &QuerySpec::new().search("park"), today())), vec![2]);
        assert_eq!(ids(&query(&tasks, &QuerySpec::new().search("  "), today())), vec![1, 2, 3]);
    }

    #[test]
    fn predicates_are_anded() {
        let tasks = sample();
        let spec = QuerySpec::new().priority(Priority::High).completed(false);
        assert_eq!(ids(&query(&tasks, &spec, today())), vec![2]);
        let spec = QuerySpec::new().priority(Priority::High).category("Work");
        assert_eq!(ids(&query(&tasks, &spec, today())), vec![3]);
    }

    #[test]
    fn due_buckets() {
        let tasks = sample();
        let run = |b| ids(&query(&tasks, &QuerySpec::new().due(b), today()));
        assert_eq!(run(DueBucket::Today), vec![1]);
        assert_eq!(run(DueBucket::Overdue), vec![2]);
        // Week of Mon 12th to Sun 18th; the dog walk (11th) falls outside.
        assert_eq!(run(DueBucket::ThisWeek), vec![1, 3]);
        assert_eq!(run(DueBucket::NoDate), Vec::<u64>::new());
    }

    #[test]
    fn due_today_ignores_time_of_day() {
        let mut late = task(1, "late");
        late.due_date = Some(
            Local
                .from_local_datetime(&today().and_hms_opt(23, 59, 0).unwrap())
                .single()
                .unwrap()
                .with_timezone(&Utc),
        );
        let out = query(&[late], &QuerySpec::new().due(DueBucket::Today), today());
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn quick_views_lower_onto_spec() {
        let tasks = sample();
        let run = |v: QuickView| ids(&query(&tasks, &QuerySpec::new().with_view(&v), today()));
        assert_eq!(run(QuickView::All), vec![1, 2, 3]);
        assert_eq!(run(QuickView::Today), vec![1]);
        assert_eq!(run(QuickView::HighPriority), vec![2, 3]);
        assert_eq!(run(QuickView::Completed), vec![3]);
        assert_eq!(run(QuickView::Category("home".into())), vec![1]);
    }

    #[test]
    fn quick_views_and_with_explicit_filters() {
        let tasks = sample();
        let run = |spec: QuerySpec| ids(&query(&tasks, &spec, today()));

        let low = QuerySpec::new().priority(Priority::Low);
        assert!(run(low.with_view(&QuickView::HighPriority)).is_empty());
        let pending = QuerySpec::new().completed(false);
        assert!(run(pending.with_view(&QuickView::Completed)).is_empty());
        let elsewhere = QuerySpec::new().category("work");
        assert!(run(elsewhere.with_view(&QuickView::Category("home".into()))).is_empty());
        let overdue = QuerySpec::new().due(DueBucket::Overdue);
        assert!(run(overdue.with_view(&QuickView::Today)).is_empty());

        // Agreeing filters narrow as usual.
        let high = QuerySpec::new().priority(Priority::High).completed(false);
        assert_eq!(run(high.with_view(&QuickView::HighPriority)), vec![2]);
        let week = QuerySpec::new().due(DueBucket::ThisWeek);
        assert_eq!(run(week.with_view(&QuickView::Today)), vec![1]);
        let home = QuerySpec::new().category("Home");
        assert_eq!(run(home.with_view(&QuickView::Category("home".into()))), vec![1]);
    }

    #[test]
    fn query_does_not_mutate_input() {
        let tasks = sample();
        let before = tasks.clone();
        let _ = query(&tasks, &QuerySpec::new().search("dog"), today());
        assert_eq!(tasks, before);
    }
}
