//! Watch mode: file watching, debouncing and the server lifecycle.

pub mod debounce;
pub mod lifecycle;
pub mod state;
pub mod watcher;

pub use debounce::{debounce, Debounce};
pub use lifecycle::Lifecycle;
pub use state::LifecycleState;
pub use watcher::{ChangeWatcher, FileChange, FsWatcher, NoWatch};
