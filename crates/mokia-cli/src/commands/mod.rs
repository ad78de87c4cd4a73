//! Command implementations for the mokia CLI.
//!
//! There is a single command: [`run`] serves a configuration module, and with
//! `--watch` keeps it in sync with the files it is built from.

pub mod run;
pub(crate) mod utils;

pub use run::{execute, run, RunOptions};
