//! Logging setup for the mokia CLI.
//!
//! Uses the `tracing` ecosystem. `--debug` shows module resolution and
//! lifecycle transitions, `--quiet` keeps only errors, and `RUST_LOG` is
//! honoured when neither flag is given.
//!
//! # Example
//!
//! ```rust,no_run
//! use mokia_cli::logger::init_logger;
//! use tracing::{debug, info};
//!
//! init_logger(false, false, false);
//!
//! info!("server started");
//! debug!(path = "mock/index.toml", "evaluating module");
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEBUG_FILTER: &str = "mokia=debug,mokia_cli=debug,mokia_graph=debug";
const QUIET_FILTER: &str = "mokia=error,mokia_cli=error,mokia_graph=error";
const DEFAULT_FILTER: &str = "mokia=info,mokia_cli=info,mokia_graph=warn";

/// Initialize the global tracing subscriber.
///
/// Call once, before anything logs. `debug` wins over `quiet`.
pub fn init_logger(debug: bool, quiet: bool, no_color: bool) {
    init_logger_with_filter(filter_for(debug, quiet), no_color);
}

/// Initialize logging with an explicit filter.
pub fn init_logger_with_filter(filter: EnvFilter, no_color: bool) {
    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .with_ansi(!no_color && should_use_colors())
        .compact();

    // A second initialization (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

fn filter_for(debug: bool, quiet: bool) -> EnvFilter {
    if debug {
        EnvFilter::new(DEBUG_FILTER)
    } else if quiet {
        EnvFilter::new(QUIET_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Whether log output should be colored.
///
/// `NO_COLOR` disables colors, `FORCE_COLOR` forces them, otherwise stderr
/// terminal capabilities decide.
pub fn should_use_colors() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::Term::stderr().features().colors_supported()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_filters_parse() {
        let _ = EnvFilter::new(DEBUG_FILTER);
        let _ = EnvFilter::new(QUIET_FILTER);
        let _ = EnvFilter::new(DEFAULT_FILTER);
    }

    #[test]
    fn test_debug_wins_over_quiet() {
        let filter = filter_for(true, true).to_string();
        assert!(filter.contains("mokia_cli=debug"));
    }

    #[test]
    #[serial]
    fn test_should_use_colors_respects_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_colors());
        unsafe {
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    #[serial]
    fn test_no_color_wins() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(!should_use_colors());
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::remove_var("FORCE_COLOR");
        }
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_logger(false, true, true);
        init_logger(true, false, true);
    }
}
