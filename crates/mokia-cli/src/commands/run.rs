//! The `mokia` command.
//!
//! # Process Flow
//!
//! Without `--watch`: load the module, start the server, serve until Ctrl+C.
//! A load or bind failure ends the process with an error.
//!
//! With `--watch`: start the server (a failure is reported, not fatal),
//! watch the dependency set, reload on change, stop on Ctrl+C.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::signal;
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::utils::{get_cwd, resolve_entry};
use crate::cli::Cli;
use crate::config::{Overrides, DEFAULT_DEBOUNCE_MS};
use crate::dev::{ChangeWatcher, FileChange, FsWatcher, Lifecycle, NoWatch};
use crate::error::Result;
use crate::server::MockServer;
use crate::ui;

/// Options accepted by [`run`].
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub overrides: Overrides,
    /// Reload when the module or one of its dependencies changes
    pub watch: bool,
    /// Poll the filesystem at this interval instead of using native events
    pub poll: Option<Duration>,
    pub debounce: Duration,
    /// Dependencies matching this pattern are not watched
    pub ignore: Option<Regex>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            overrides: Overrides::default(),
            watch: false,
            poll: None,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            ignore: Regex::new(mokia_graph::DEFAULT_IGNORE).ok(),
        }
    }
}

/// Execute the command described by parsed arguments.
pub async fn execute(args: Cli) -> Result<()> {
    let options = args.run_options();
    run(&args.entry, options).await
}

/// Serve the configuration module at `entry`.
///
/// # Errors
///
/// Outside watch mode, any load, configuration or bind error. In watch mode
/// only failing to set up the file watcher is an error.
pub async fn run(entry: &Path, options: RunOptions) -> Result<()> {
    let entry = resolve_entry(entry, &get_cwd()?)?;

    if !options.watch {
        return serve(entry, options).await;
    }

    let (tx, rx) = mpsc::unbounded_channel();
    match options.poll {
        Some(interval) => {
            let watcher = FsWatcher::polling(tx, interval)?;
            watch(entry, options, watcher, rx).await
        }
        None => {
            let watcher = FsWatcher::recommended(tx)?;
            watch(entry, options, watcher, rx).await
        }
    }
}

async fn serve(entry: PathBuf, options: RunOptions) -> Result<()> {
    let mut lifecycle = Lifecycle::new(entry, MockServer::new(), NoWatch)
        .with_overrides(options.overrides)
        .with_ignore(options.ignore);

    lifecycle.start().await?;
    ui::info("Press Ctrl+C to stop");

    signal::ctrl_c().await?;
    lifecycle.shutdown().await;
    Ok(())
}

async fn watch<W: ChangeWatcher>(
    entry: PathBuf,
    options: RunOptions,
    watcher: W,
    changes: UnboundedReceiver<FileChange>,
) -> Result<()> {
    let mut lifecycle = Lifecycle::new(entry, MockServer::new(), watcher)
        .with_overrides(options.overrides)
        .with_ignore(options.ignore)
        .with_debounce(options.debounce)
        .watching(true);

    if let Err(err) = lifecycle.start().await {
        ui::error(&err.to_string());
    }
    lifecycle.arm();
    ui::info(&format!(
        "Watching {} file(s) for changes, press Ctrl+C to stop",
        lifecycle.dependencies().len()
    ));

    lifecycle
        .watch(changes, async {
            let _ = signal::ctrl_c().await;
        })
        .await;

    ui::success("Server stopped");
    Ok(())
}
