//! # taskboard
//!
//! Task repository and derived-view engine behind the `tb` CLI.
//!
//! ## Module Organization
//!
//! - `task`, `category`, `fields`: the data model
//! - `record`: the async record store boundary every backend implements
//! - `codec`: field-name translation between the model and backend records
//! - `backend`: in-memory and JSON file record stores
//! - `store`, `categories`: CRUD over tasks and categories
//! - `query`: pure filtering over a task snapshot
//! - `stats`: completion statistics and insights
//! - `projection`: per-category active task counts
//! - `events`: change notifications published by the stores
//! - `config`: `config.toml` loading
//! - `cli`, `cmd`, `format`: the command-line front end
//!
//! ```no_run
//! use std::sync::Arc;
//! use taskboard::backend::MemoryBackend;
//! use taskboard::store::TaskStore;
//! use taskboard::task::NewTask;
//!
//! # async fn demo() -> taskboard::Result<()> {
//! let store = TaskStore::new(Arc::new(MemoryBackend::new()));
//! let task = store.create(NewTask::titled("Buy bread")).await?;
//! assert_eq!(task.id, 1);
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod categories;
pub mod category;
pub mod cli;
pub mod cmd;
pub mod codec;
pub mod config;
pub mod error;
pub mod events;
pub mod fields;
pub mod fixtures;
pub mod format;
pub mod projection;
pub mod query;
pub mod record;
pub mod stats;
pub mod store;
pub mod task;

pub use error::{Error, Result};
