//! Lifecycle state tracking.

/// Where the server lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    /// No server, nothing in progress
    #[default]
    Idle,
    /// Loading the configuration and binding
    Starting,
    /// Serving on `port`
    Running { port: u16 },
    /// Waiting for the previous instance to close its socket
    Stopping,
    /// The last start failed; no server, still watching for a fix
    Failed,
}

impl LifecycleState {
    pub fn is_running(&self) -> bool {
        matches!(self, LifecycleState::Running { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, LifecycleState::Failed)
    }

    /// Port being served, if running.
    pub fn port(&self) -> Option<u16> {
        match self {
            LifecycleState::Running { port } => Some(*port),
            _ => None,
        }
    }
}
