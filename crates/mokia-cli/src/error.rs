//! Error handling for the mokia CLI.
//!
//! `CliError` is the top-level error returned by commands. Domain errors
//! (`ConfigError`, `ServerError` and the module graph's `GraphError`) convert
//! into it automatically, and the binary turns it into a miette report at the
//! very end (see [`cli_error_to_miette`]).

mod miette;

pub use self::miette::{cli_error_to_miette, graph_error_to_miette};

use mokia_graph::GraphError;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Merging settings from defaults, module, environment and flags failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The configuration module could not be loaded
    #[error("{0}")]
    Graph(#[from] GraphError),

    /// The mock server could not be started or stopped
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),
}

/// Errors while merging server settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A merged value has the wrong type (e.g. `MOKIA_PORT=abc`)
    #[error("{0}\n\nHint: Check the module settings and MOKIA_* environment variables")]
    Extract(#[from] figment::Error),

    /// Invalid value for a setting
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        field: String,
        value: String,
        hint: String,
    },
}

/// Mock server engine errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind to {addr}: {source}\n\nHint: Is another process using this port? Try --port 0")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// A route could not be turned into a handler
    #[error("Invalid route '{key}': {reason}")]
    InvalidRoute { key: String, reason: String },

    /// The server task did not shut down cleanly
    #[error("Shutdown failed: {0}")]
    Teardown(String),
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;
