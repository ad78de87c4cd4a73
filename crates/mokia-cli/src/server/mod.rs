//! Mock HTTP server engine.
//!
//! The lifecycle controller only sees the [`ServerEngine`] trait: hand it a
//! [`ServerConfig`], get back a [`ServerHandle`] holding the bound port and a
//! teardown. [`MockServer`] is the axum implementation.

mod engine;
mod router;

pub use engine::MockServer;
pub use router::{PreparedRoute, RouteTable};

use async_trait::async_trait;

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Creates running server instances.
#[async_trait]
pub trait ServerEngine: Send + Sync {
    /// Bind and start serving `config`.
    ///
    /// Returns once the listener is bound, so the handle's port is live.
    async fn create(&self, config: ServerConfig) -> Result<ServerHandle, ServerError>;
}

/// Stops a running server instance.
#[async_trait]
pub trait Teardown: Send {
    /// Stop serving and wait until the listening socket is closed.
    ///
    /// Calling it again after it returned is a no-op.
    async fn destroy(&mut self) -> Result<(), ServerError>;
}

/// A running server: its port and how to stop it.
pub struct ServerHandle {
    port: u16,
    teardown: Box<dyn Teardown>,
}

impl ServerHandle {
    pub fn new(port: u16, teardown: impl Teardown + 'static) -> Self {
        Self {
            port,
            teardown: Box::new(teardown),
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn destroy(&mut self) -> Result<(), ServerError> {
        self.teardown.destroy().await
    }
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}
