//! Command-line interface definition for mokia.
//!
//! ```text
//! mokia [ENTRY] [--host|-H] [--port|-p] [--prefix] [--priority]
//!       [--watch|-w] [--silent|-s] [--debug] [--poll <MS>] [--debounce <MS>]
//!       [--ignore <REGEX>] [--quiet|-q] [--no-color]
//! ```

mod validation;

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use crate::commands::RunOptions;
use crate::config::{Overrides, DEFAULT_ENTRY};

pub use validation::{parse_ignore, parse_millis, parse_priority, IgnorePattern, PriorityList};

/// mokia - a live-reloading mock HTTP server
#[derive(Parser, Debug)]
#[command(
    name = "mokia",
    version,
    about = "A live-reloading mock HTTP server",
    long_about = "Serves mock routes declared in a TOML or JSON configuration module.\n\
                  With --watch, the server restarts whenever the module or any file it\n\
                  imports changes."
)]
pub struct Cli {
    /// Configuration module to serve (a directory means its index module)
    #[arg(value_name = "ENTRY", default_value = DEFAULT_ENTRY)]
    pub entry: PathBuf,

    /// Host to listen on
    #[arg(short = 'H', long)]
    pub host: Option<String>,

    /// Port to listen on (0 picks a free port)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Path prefix prepended to every route
    #[arg(long)]
    pub prefix: Option<String>,

    /// Comma-separated route keys matched before all others
    ///
    /// Example: --priority "GET /users/me,/health"
    #[arg(long, value_name = "ROUTES", value_parser = parse_priority)]
    pub priority: Option<PriorityList>,

    /// Restart the server when the module or its dependencies change
    #[arg(short, long)]
    pub watch: bool,

    /// Do not log requests
    #[arg(short, long)]
    pub silent: bool,

    /// Enable debug logging (module resolution, reload steps)
    #[arg(long)]
    pub debug: bool,

    /// Poll for changes every MS milliseconds instead of using OS events
    #[arg(long, value_name = "MS", value_parser = parse_millis, requires = "watch")]
    pub poll: Option<Duration>,

    /// Quiet period in milliseconds before a change triggers a reload
    #[arg(long, value_name = "MS", default_value = "500", value_parser = parse_millis)]
    pub debounce: Duration,

    /// Regex of dependency paths that are never watched (empty to watch all)
    #[arg(long, value_name = "REGEX", default_value = mokia_graph::DEFAULT_IGNORE, value_parser = parse_ignore)]
    pub ignore: IgnorePattern,

    /// Suppress all output except errors
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Settings given on the command line, for merging over the module.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            prefix: self.prefix.clone(),
            priority: self.priority.as_ref().map(|p| p.0.clone()),
            silent: self.silent.then_some(true),
        }
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            overrides: self.overrides(),
            watch: self.watch,
            poll: self.poll,
            debounce: self.debounce,
            ignore: self.ignore.0.clone(),
        }
    }
}
