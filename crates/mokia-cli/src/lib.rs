//! mokia CLI - a live-reloading mock HTTP server.
//!
//! Serves the routes declared in a configuration module (see `mokia-graph`)
//! and, in watch mode, restarts the server whenever the module or anything it
//! imports changes.
//!
//! # Architecture
//!
//! - [`cli`] - Argument parsing
//! - [`config`] - Merging defaults, module settings, environment and flags
//! - [`server`] - The mock HTTP server engine
//! - [`dev`] - File watching, debouncing and the server lifecycle
//! - [`commands`] - The `mokia` command itself
//! - [`error`], [`logger`], [`ui`] - Errors, logging and terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use mokia_cli::commands::{run, RunOptions};
//! use std::path::Path;
//!
//! # async fn demo() -> mokia_cli::Result<()> {
//! let options = RunOptions {
//!     watch: true,
//!     ..RunOptions::default()
//! };
//! run(Path::new("mock/index.toml"), options).await
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod dev;
pub mod error;
pub mod logger;
pub mod server;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ServerError};
