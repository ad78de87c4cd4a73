//! File watching for the reload loop.
//!
//! [`FsWatcher`] watches the parent directory of every registered file
//! (non-recursively) and forwards only events about registered paths. Editors
//! that save by writing a temp file and renaming it over the original are
//! observed this way, which a watch on the file inode itself would miss.

use mokia_graph::DependencySet;
use notify::{Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::RwLock;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::error::{CliError, Result};

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }

    fn from_event(kind: &EventKind, path: PathBuf) -> Option<Self> {
        match kind {
            EventKind::Create(_) => Some(FileChange::Created(path)),
            EventKind::Modify(_) => Some(FileChange::Modified(path)),
            EventKind::Remove(_) => Some(FileChange::Removed(path)),
            _ => None,
        }
    }
}

/// The set of files the reload loop is notified about.
///
/// Events are emitted one per filesystem notification; coalescing is the
/// caller's job.
pub trait ChangeWatcher: Send {
    /// Start watching `paths`. Already watched paths are left alone.
    fn add(&mut self, paths: &DependencySet);

    /// Stop watching everything. No events are forwarded until the next `add`.
    fn clear(&mut self);

    /// Paths currently registered.
    fn watched(&self) -> DependencySet;
}

/// Watcher used when reloading is off; registers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWatch;

impl ChangeWatcher for NoWatch {
    fn add(&mut self, _paths: &DependencySet) {}

    fn clear(&mut self) {}

    fn watched(&self) -> DependencySet {
        DependencySet::new()
    }
}

/// [`ChangeWatcher`] over a `notify` back end.
pub struct FsWatcher<W: Watcher> {
    watcher: W,
    registered: Arc<RwLock<HashSet<PathBuf>>>,
    /// Watched parent directories and how many registered files live in each
    directories: HashMap<PathBuf, usize>,
}

impl FsWatcher<RecommendedWatcher> {
    /// Watcher using the platform's native event API.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS watcher cannot be created.
    pub fn recommended(tx: UnboundedSender<FileChange>) -> Result<Self> {
        let registered = Arc::new(RwLock::new(HashSet::new()));
        let watcher = notify::recommended_watcher(forward(registered.clone(), tx))
            .map_err(CliError::Watch)?;
        Ok(Self::with_watcher(watcher, registered))
    }
}

impl FsWatcher<PollWatcher> {
    /// Watcher that scans registered directories every `interval`.
    ///
    /// Useful on network drives and in containers where native events are
    /// not delivered.
    pub fn polling(tx: UnboundedSender<FileChange>, interval: Duration) -> Result<Self> {
        let registered = Arc::new(RwLock::new(HashSet::new()));
        let config = notify::Config::default().with_poll_interval(interval);
        let watcher =
            PollWatcher::new(forward(registered.clone(), tx), config).map_err(CliError::Watch)?;
        Ok(Self::with_watcher(watcher, registered))
    }
}

impl<W: Watcher> FsWatcher<W> {
    fn with_watcher(watcher: W, registered: Arc<RwLock<HashSet<PathBuf>>>) -> Self {
        Self {
            watcher,
            registered,
            directories: HashMap::new(),
        }
    }

    fn watch_directory(&mut self, dir: &Path) {
        if let Some(count) = self.directories.get_mut(dir) {
            *count += 1;
            return;
        }

        match self.watcher.watch(dir, RecursiveMode::NonRecursive) {
            Ok(()) => {
                debug!(dir = %dir.display(), "watching directory");
                self.directories.insert(dir.to_path_buf(), 1);
            }
            Err(err) => warn!(dir = %dir.display(), error = %err, "cannot watch directory"),
        }
    }
}

impl<W: Watcher + Send> ChangeWatcher for FsWatcher<W> {
    fn add(&mut self, paths: &DependencySet) {
        for path in paths {
            if !self.registered.write().insert(path.clone()) {
                continue;
            }
            match path.parent() {
                Some(dir) => self.watch_directory(dir),
                None => warn!(path = %path.display(), "cannot watch a path without a parent"),
            }
        }
    }

    fn clear(&mut self) {
        self.registered.write().clear();
        for (dir, _) in self.directories.drain() {
            if let Err(err) = self.watcher.unwatch(&dir) {
                debug!(dir = %dir.display(), error = %err, "unwatch failed");
            }
        }
    }

    fn watched(&self) -> DependencySet {
        self.registered.read().iter().cloned().collect()
    }
}

/// Event handler run on notify's thread: filter and forward, nothing else.
fn forward(
    registered: Arc<RwLock<HashSet<PathBuf>>>,
    tx: UnboundedSender<FileChange>,
) -> impl FnMut(notify::Result<Event>) + Send + 'static {
    move |res: notify::Result<Event>| {
        let event = match res {
            Ok(event) => event,
            Err(err) => {
                warn!(error = %err, "watch error");
                return;
            }
        };

        let registered = registered.read();
        for path in event.paths {
            if !registered.contains(&path) {
                continue;
            }
            if let Some(change) = FileChange::from_event(&event.kind, path) {
                let _ = tx.send(change);
            }
        }
    }
}
