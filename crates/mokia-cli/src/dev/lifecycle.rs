//! Server lifecycle controller.
//!
//! Owns the single running server instance, the module cache, the dependency
//! set and the watch registration. A reload always runs the same sequence:
//!
//! 1. tear the running server down and wait for its socket to close
//! 2. invalidate every module in the previous dependency set
//! 3. clear the watch registration
//! 4. load the configuration again and start a new server
//! 5. resolve the dependency set again and re-arm the watcher
//!
//! A failed start leaves no server running but keeps the watcher armed, so
//! the next edit gets another chance.

use mokia_graph::{DependencyResolver, DependencySet, ModuleCache};
use regex::Regex;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

use super::debounce::debounce;
use super::state::LifecycleState;
use super::watcher::{ChangeWatcher, FileChange};
use crate::config::{Overrides, ServerConfig, DEFAULT_DEBOUNCE_MS};
use crate::error::{CliError, Result, ServerError};
use crate::server::{ServerEngine, ServerHandle};
use crate::ui;

/// Drives start, reload and shutdown of the mock server.
pub struct Lifecycle<E, W> {
    entry: PathBuf,
    overrides: Overrides,
    engine: E,
    watcher: W,
    resolver: DependencyResolver,
    cache: ModuleCache,
    handle: Option<ServerHandle>,
    dependencies: DependencySet,
    state: LifecycleState,
    debounce: Duration,
    watching: bool,
}

impl<E: ServerEngine, W: ChangeWatcher> Lifecycle<E, W> {
    pub fn new(entry: impl AsRef<Path>, engine: E, watcher: W) -> Self {
        Self {
            entry: mokia_graph::absolutize(entry.as_ref()),
            overrides: Overrides::default(),
            engine,
            watcher,
            resolver: DependencyResolver::default(),
            cache: ModuleCache::new(),
            handle: None,
            dependencies: DependencySet::new(),
            state: LifecycleState::Idle,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            watching: false,
        }
    }

    /// Settings that win over everything the module declares.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Paths matching `ignore` are never watched nor invalidated.
    pub fn with_ignore(mut self, ignore: Option<Regex>) -> Self {
        self.resolver = DependencyResolver::new(ignore);
        self
    }

    /// Quiet period before a change triggers a reload.
    pub fn with_debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Whether a failed start waits for a change instead of ending the run.
    pub fn watching(mut self, watching: bool) -> Self {
        self.watching = watching;
        self
    }

    pub fn entry(&self) -> &Path {
        &self.entry
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Port of the running server, if any.
    pub fn port(&self) -> Option<u16> {
        self.handle.as_ref().map(ServerHandle::port)
    }

    /// Last computed dependency set.
    pub fn dependencies(&self) -> &DependencySet {
        &self.dependencies
    }

    pub fn watcher(&self) -> &W {
        &self.watcher
    }

    pub fn cache(&self) -> &ModuleCache {
        &self.cache
    }

    /// Load the configuration and start a server.
    ///
    /// # Errors
    ///
    /// Returns the load, configuration or bind error. No server is left
    /// running in that case and the state is `Failed`.
    pub async fn start(&mut self) -> Result<u16> {
        self.state = LifecycleState::Starting;
        let spinner = ui::Spinner::new("Loading...");

        match self.try_start().await {
            Ok(port) => {
                spinner.finish(&format!("Server is listening on port {port}."));
                info!(port, entry = %self.entry.display(), "server running");
                self.state = LifecycleState::Running { port };
                Ok(port)
            }
            Err(err) => {
                spinner.fail(&failure_message(&err, &self.entry, self.watching));
                self.state = LifecycleState::Failed;
                Err(err)
            }
        }
    }

    async fn try_start(&mut self) -> Result<u16> {
        let module = self.cache.load(&self.entry)?;
        let config = ServerConfig::from_module(&module, &self.overrides)?;
        let handle = self.engine.create(config).await?;
        let port = handle.port();
        self.handle = Some(handle);
        Ok(port)
    }

    /// Stop the running server, if any, and wait for its socket to close.
    ///
    /// Teardown failures are reported and otherwise ignored.
    pub async fn teardown(&mut self) {
        let Some(mut handle) = self.handle.take() else {
            return;
        };

        self.state = LifecycleState::Stopping;
        if let Err(err) = handle.destroy().await {
            warn!(port = handle.port(), error = %err, "server teardown failed");
            ui::warning(&format!("Could not stop the server cleanly: {err}"));
        }
        self.state = LifecycleState::Idle;
    }

    /// Resolve the dependency set and register it with the watcher.
    pub fn arm(&mut self) {
        self.dependencies = self.resolver.resolve(&self.entry);
        debug!(files = self.dependencies.len(), "watching dependency set");
        self.watcher.add(&self.dependencies);
    }

    /// Restart after `changed` was modified.
    ///
    /// # Errors
    ///
    /// Returns the start error. The watcher is re-armed regardless.
    pub async fn reload(&mut self, changed: &Path) -> Result<u16> {
        info!(path = %changed.display(), "change detected");
        ui::status("Server is restarting...");

        self.teardown().await;
        self.cache.invalidate(&self.dependencies);
        self.watcher.clear();

        let result = self.start().await;

        let fresh = self.resolver.resolve(&self.entry);
        self.dependencies = if result.is_ok() {
            fresh
        } else {
            // Keep the files that made up the last good state in view too.
            let mut union = std::mem::take(&mut self.dependencies);
            union.extend(fresh);
            union
        };
        self.watcher.add(&self.dependencies);
        debug!(files = self.dependencies.len(), "re-armed watcher");

        result
    }

    /// Run the watch loop until `shutdown` resolves.
    ///
    /// Changes are debounced; reloads run one at a time, and reload requests
    /// that queue up behind a running reload collapse into one carrying the
    /// latest path.
    pub async fn watch<S>(&mut self, mut changes: UnboundedReceiver<FileChange>, shutdown: S)
    where
        S: Future,
    {
        let (reload_tx, mut reload_rx) = mpsc::unbounded_channel::<PathBuf>();
        let mut trigger = debounce(
            move |path: PathBuf| {
                let _ = reload_tx.send(path);
            },
            self.debounce,
        );

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                Some(change) = changes.recv() => {
                    debug!(?change, "file change");
                    trigger.call(change.path().to_path_buf());
                }
                Some(mut path) = reload_rx.recv() => {
                    while let Ok(next) = reload_rx.try_recv() {
                        path = next;
                    }
                    if let Err(err) = self.reload(&path).await {
                        ui::error(&err.to_string());
                    }
                }
            }
        }

        trigger.cancel();
        self.shutdown().await;
    }

    /// Stop the server and the watcher.
    pub async fn shutdown(&mut self) {
        self.teardown().await;
        self.watcher.clear();
        self.state = LifecycleState::Idle;
        info!("server stopped");
    }
}

/// Spinner text for a failed start.
fn failure_message(err: &CliError, entry: &Path, watching: bool) -> String {
    let message = match err {
        CliError::Server(ServerError::Bind { addr, .. }) => format!("Could not bind to {addr}"),
        CliError::Server(_) => "Could not start the server".to_string(),
        _ => format!("Could not load: {}", entry.display()),
    };

    if watching {
        format!("{message}, waiting for change...")
    } else {
        message
    }
}
