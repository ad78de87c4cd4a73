//! Error types for module resolution and evaluation.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T, E = GraphError> = std::result::Result<T, E>;

/// Errors produced while resolving, reading or evaluating configuration modules.
#[derive(Debug, Error)]
pub enum GraphError {
    /// The file could not be read from disk
    #[error("Failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML/JSON
    #[error("Failed to parse '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    /// The file extension is not a known module format
    #[error("Unsupported module format: {} (expected .toml or .json)", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The module parsed but its content does not describe a valid module
    #[error("Invalid module '{}': {message}", .path.display())]
    InvalidModule { path: PathBuf, message: String },

    /// A route key or route definition is malformed
    #[error("Invalid route '{key}' in '{}': {reason}", .path.display())]
    InvalidRoute {
        path: PathBuf,
        key: String,
        reason: String,
    },

    /// A specifier did not resolve to any file
    #[error("Failed to resolve '{specifier}' from '{}'", .from.display())]
    ResolutionFailed { specifier: String, from: PathBuf },

    /// A module (transitively) imports itself
    #[error("Circular import detected:\n{cycle}")]
    CircularImport { cycle: String },
}

impl GraphError {
    /// File the error originated from, when known.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            GraphError::Read { path, .. }
            | GraphError::Parse { path, .. }
            | GraphError::InvalidModule { path, .. }
            | GraphError::InvalidRoute { path, .. } => Some(path),
            GraphError::UnsupportedFormat(path) => Some(path),
            GraphError::ResolutionFailed { from, .. } => Some(from),
            GraphError::CircularImport { .. } => None,
        }
    }
}
