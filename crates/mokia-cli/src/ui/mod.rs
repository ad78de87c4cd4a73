//! Terminal UI: spinner, status messages and request log lines.
//!
//! Everything here writes to stderr so stdout stays free for piping.
//!
//! # Examples
//!
//! ```no_run
//! use mokia_cli::ui;
//!
//! ui::init_colors(false);
//!
//! let spinner = ui::Spinner::new("Loading...");
//! spinner.finish("Server is listening on port 8080.");
//!
//! ui::status("Server is restarting...");
//! ui::info("Watching 3 files");
//! ui::warning("Unknown priority route 'GET /nope' ignored");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_request, request};
pub use messages::{error, info, status, success, warning};
pub use spinner::Spinner;

/// Check if color output should be enabled.
///
/// Respects NO_COLOR and FORCE_COLOR, falls back to terminal detection.
pub fn should_use_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    console::user_attended_stderr()
}

/// Initialize color support.
///
/// Colors are disabled by `--no-color`, by NO_COLOR, or when stderr is not a
/// terminal. The choice is stored in `console`'s global switch, which both the
/// spinner and the status messages consult.
pub fn init_colors(no_color: bool) {
    let enabled = !no_color && should_use_color();
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

pub(crate) fn colors_enabled() -> bool {
    console::colors_enabled_stderr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_should_use_color_no_color() {
        unsafe {
            std::env::set_var("NO_COLOR", "1");
            std::env::remove_var("FORCE_COLOR");
        }
        assert!(!should_use_color());
        unsafe { std::env::remove_var("NO_COLOR") };
    }

    #[test]
    #[serial]
    fn test_should_use_color_force_color() {
        unsafe {
            std::env::remove_var("NO_COLOR");
            std::env::set_var("FORCE_COLOR", "1");
        }
        assert!(should_use_color());
        unsafe { std::env::remove_var("FORCE_COLOR") };
    }

    #[test]
    #[serial]
    fn test_init_colors_no_color_flag() {
        unsafe { std::env::set_var("FORCE_COLOR", "1") };
        init_colors(true);
        assert!(!colors_enabled());
        unsafe { std::env::remove_var("FORCE_COLOR") };
    }
}
