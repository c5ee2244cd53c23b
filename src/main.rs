//! # tb - Task Board CLI
//!
//! Tasks with priorities, categories and due dates, plus filtered views and
//! completion statistics.
//!
//! ## Quick Start
//!
//! ```bash
//! # Add a task
//! tb add "Buy bread" --category home --priority high --due today
//!
//! # List what is due today and still open
//! tb list --view today --pending
//!
//! # Complete it and check progress
//! tb complete 1
//! tb stats --detail
//!
//! # Try everything against sample data without touching disk
//! tb --memory list
//! ```
//!
//! Data is stored locally in `~/.taskboard/board.json`. Settings live next to
//! it in `config.toml`.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{debug, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use taskboard::backend::{Backend, JsonFileBackend, MemoryBackend};
use taskboard::categories::CategoryStore;
use taskboard::cli::Cli;
use taskboard::cmd::{dispatch, App, Commands};
use taskboard::config::{BackendKind, Config};
use taskboard::events::EventBus;
use taskboard::fixtures::seeded_backend;
use taskboard::store::TaskStore;
use taskboard::Result;

fn data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".taskboard")
}

fn init_tracing(config: &Config) {
    // RUST_LOG wins over the config file; ignore filters that fail to parse.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .or_else(|| EnvFilter::try_new(&config.log.filter).ok())
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn open_backend(cli: &Cli, config: &Config, dir: &std::path::Path) -> Result<Backend> {
    if cli.memory || (cli.db.is_none() && config.storage.backend == BackendKind::Memory) {
        let backend = if config.storage.seed_fixtures {
            seeded_backend()?
        } else {
            MemoryBackend::new()
        };
        debug!("using in-memory backend");
        return Ok(Backend::Memory(backend));
    }
    let path = cli.db.clone().unwrap_or_else(|| config.data_path(dir));
    Ok(Backend::File(JsonFileBackend::open(path).await?))
}

async fn run(cli: Cli, config: Config, dir: PathBuf) -> Result<()> {
    // Completions don't need storage.
    if let Commands::Completions { shell } = cli.command {
        taskboard::cmd::cmd_completions(shell);
        return Ok(());
    }

    let backend = Arc::new(open_backend(&cli, &config, &dir).await?);
    let events = EventBus::default();
    let app = App {
        tasks: TaskStore::with_events(Arc::clone(&backend), events.clone()),
        categories: CategoryStore::with_events(backend, events),
        json: cli.json,
    };
    dispatch(&app, cli.command).await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let dir = match cli.db.as_ref() {
        Some(db) => db
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
        None => data_dir(),
    };
    let config_path = cli.config.clone().unwrap_or_else(|| dir.join("config.toml"));
    let (config, load_error) = Config::load_or_default(&config_path);
    init_tracing(&config);
    match load_error {
        Some(e) => warn!(config = %config_path.display(), error = %e, "ignoring invalid config"),
        None => debug!(config = %config_path.display(), "configuration loaded"),
    }

    if let Err(e) = run(cli, config, dir).await {
        eprintln!("error: {e}");
        std::process::exit(e.exit_code());
    }
}
