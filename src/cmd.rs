//! Command implementations for the CLI interface.
//!
//! Each subcommand maps onto one store, query or stats operation. Handlers
//! return errors to `main`, which prints them and picks the exit code.

use std::io;

use chrono::{Local, NaiveDate};
use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};
use serde::Serialize;

use crate::backend::Backend;
use crate::categories::CategoryStore;
use crate::category::{CategoryPatch, NewCategory};
use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::fields::{DueBucket, Priority, QuickView};
use crate::format::*;
use crate::projection::{project_counts, total_active, with_counts};
use crate::query::{query, QuerySpec};
use crate::stats::{aggregate, insights, priority_breakdown, weekly_completions};
use crate::store::TaskStore;
use crate::task::{NewTask, Task, TaskPatch};

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Category key, e.g. "work". Defaults to "general".
        #[arg(long)]
        category: Option<String>,
        /// Priority: low | medium | high. Defaults to medium.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "fri" or "in Nd".
        #[arg(long)]
        due: Option<String>,
    },

    /// List tasks with optional filters. Filters combine with AND.
    List {
        /// Sidebar view: all | today | high-priority | completed | <category key>.
        #[arg(long)]
        view: Option<String>,
        /// Case-insensitive text to find in title or description.
        #[arg(long, short = 's')]
        search: Option<String>,
        /// Filter by category key.
        #[arg(long)]
        category: Option<String>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Only completed tasks.
        #[arg(long, conflicts_with = "pending")]
        completed: bool,
        /// Only tasks not yet completed.
        #[arg(long)]
        pending: bool,
        /// Due filter: today | this-week | overdue | none.
        #[arg(long, value_enum)]
        due: Option<DueBucket>,
        /// Include archived tasks.
        #[arg(long)]
        archived: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// View a single task.
    View {
        id: u64,
    },

    /// Update fields on a task.
    Update {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,
        /// Clear due date.
        #[arg(long)]
        clear_due: bool,
    },

    /// Mark a task done.
    Complete {
        id: u64,
    },

    /// Mark a completed task as not done.
    Reopen {
        id: u64,
    },

    /// Hide a task from active views without deleting it.
    Archive {
        id: u64,
    },

    /// Restore an archived task.
    Unarchive {
        id: u64,
    },

    /// List archived tasks.
    Archived,

    /// Permanently delete a task.
    Delete {
        id: u64,
    },

    /// Completion statistics.
    Stats {
        /// Also show this week's completions, priority breakdown and insights.
        #[arg(long)]
        detail: bool,
    },

    /// Manage categories.
    Category {
        #[command(subcommand)]
        action: CategoryAction,
    },

    /// Generate shell completion scripts.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories with their active task counts.
    List,
    /// Add a category. Its key is derived from the name.
    Add {
        name: String,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
    },
    /// Rename, recolor or reorder a category. The key never changes.
    Update {
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        order: Option<u32>,
    },
    /// Delete a category. Tasks keep their category key.
    Delete {
        id: u64,
    },
}

/// Stores and output mode shared by every handler.
pub struct App {
    pub tasks: TaskStore<Backend>,
    pub categories: CategoryStore<Backend>,
    pub json: bool,
}

impl App {
    fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce()) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text();
        }
        Ok(())
    }

    fn emit_task(&self, verb: &str, task: &Task) -> Result<()> {
        self.emit(task, || println!("{verb} task {}: {}", task.id, task.title))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn dispatch(app: &App, command: Commands) -> Result<()> {
    match command {
        Commands::Add { title, desc, category, priority, due } => {
            cmd_add(app, title, desc, category, priority, due).await
        }
        Commands::List {
            view,
            search,
            category,
            priority,
            completed,
            pending,
            due,
            archived,
            limit,
        } => {
            let spec = QuerySpec {
                include_archived: archived,
                category,
                due,
                priority,
                completed: if completed {
                    Some(true)
                } else if pending {
                    Some(false)
                } else {
                    None
                },
                search,
                ..Default::default()
            };
            let view = view.as_deref().map(QuickView::parse).unwrap_or(QuickView::All);
            cmd_list(app, &view, spec, limit).await
        }
        Commands::View { id } => cmd_view(app, id).await,
        Commands::Update { id, title, desc, category, priority, due, clear_due } => {
            let due_date = match (due, clear_due) {
                (Some(s), _) => Some(Some(parse_due(&s)?)),
                (None, true) => Some(None),
                (None, false) => None,
            };
            let patch = TaskPatch {
                title,
                description: desc,
                category_id: category,
                priority,
                due_date,
                ..Default::default()
            };
            if patch.is_empty() {
                return Err(Error::InvalidArgument("nothing to update".into()));
            }
            let task = app.tasks.update(id, patch).await?;
            app.emit_task("Updated", &task)
        }
        Commands::Complete { id } => {
            let task = app.tasks.update(id, TaskPatch::completed(true)).await?;
            app.emit_task("Completed", &task)
        }
        Commands::Reopen { id } => {
            let task = app.tasks.update(id, TaskPatch::completed(false)).await?;
            app.emit_task("Reopened", &task)
        }
        Commands::Archive { id } => {
            let task = app.tasks.archive(id).await?;
            app.emit_task("Archived", &task)
        }
        Commands::Unarchive { id } => {
            let task = app.tasks.unarchive(id).await?;
            app.emit_task("Restored", &task)
        }
        Commands::Archived => {
            let tasks = app.tasks.list_archived().await?;
            app.emit(&tasks, || {
                if tasks.is_empty() {
                    println!("No archived tasks.");
                } else {
                    print_table(&tasks, today());
                }
            })
        }
        Commands::Delete { id } => {
            let task = app.tasks.delete(id).await?;
            app.emit_task("Deleted", &task)
        }
        Commands::Stats { detail } => cmd_stats(app, detail).await,
        Commands::Category { action } => cmd_category(app, action).await,
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    }
}

/// Create a task from CLI arguments.
pub async fn cmd_add(
    app: &App,
    title: String,
    desc: Option<String>,
    category: Option<String>,
    priority: Option<Priority>,
    due: Option<String>,
) -> Result<()> {
    let new = NewTask {
        title,
        description: desc,
        category_id: category,
        priority,
        due_date: due.as_deref().map(parse_due).transpose()?,
    };
    let task = app.tasks.create(new).await?;
    app.emit_task("Added", &task)
}

/// List tasks matching a quick view plus explicit filters.
pub async fn cmd_list(
    app: &App,
    view: &QuickView,
    spec: QuerySpec,
    limit: Option<usize>,
) -> Result<()> {
    let spec = spec.with_view(view);
    let all = app.tasks.list().await?;
    let mut filtered = query(&all, &spec, today());
    if let Some(n) = limit {
        filtered.truncate(n);
    }
    app.emit(&filtered, || {
        println!("{}\n", view.title());
        if filtered.is_empty() {
            println!("No tasks found.");
        } else {
            print_table(&filtered, today());
        }
    })
}

pub async fn cmd_view(app: &App, id: u64) -> Result<()> {
    let task = app.tasks.get(id).await?;
    app.emit(&task, || print_task(&task, today()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport {
    #[serde(flatten)]
    stats: crate::stats::Stats,
    #[serde(skip_serializing_if = "Option::is_none")]
    week: Option<Vec<crate::stats::DayCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    priorities: Option<Vec<crate::stats::PriorityCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    insights: Option<crate::stats::Insights>,
}

pub async fn cmd_stats(app: &App, detail: bool) -> Result<()> {
    let tasks = app.tasks.list().await?;
    let today = today();
    let report = StatsReport {
        stats: aggregate(&tasks, today),
        week: detail.then(|| weekly_completions(&tasks, today)),
        priorities: detail.then(|| priority_breakdown(&tasks)),
        insights: detail.then(|| insights(&tasks, today)),
    };
    app.emit(&report, || {
        print_stats(&report.stats);
        if let Some(week) = &report.week {
            print_week(week);
        }
        if let Some(rows) = &report.priorities {
            print_priorities(rows);
        }
        if let Some(i) = &report.insights {
            print_insights(i);
        }
    })
}

pub async fn cmd_category(app: &App, action: CategoryAction) -> Result<()> {
    match action {
        CategoryAction::List => {
            let (categories, tasks) =
                tokio::try_join!(app.categories.all(), app.tasks.list())?;
            let counts = project_counts(&tasks, &categories);
            let categories = with_counts(&categories, &tasks);
            app.emit(&categories, || {
                print_categories(&categories);
                println!("\nAll tasks: {}", total_active(&counts));
            })
        }
        CategoryAction::Add { name, color, icon } => {
            let created = app
                .categories
                .create(NewCategory { name, color, icon })
                .await?;
            app.emit(&created, || {
                println!("Added category {} ({})", created.name, created.key)
            })
        }
        CategoryAction::Update { id, name, color, icon, order } => {
            let updated = app
                .categories
                .update(id, CategoryPatch { name, color, icon, order })
                .await?;
            app.emit(&updated, || println!("Updated category {}", updated.id))
        }
        CategoryAction::Delete { id } => {
            let deleted = app.categories.delete(id).await?;
            app.emit(&deleted, || {
                println!("Deleted category {} ({})", deleted.name, deleted.key)
            })
        }
    }
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}
