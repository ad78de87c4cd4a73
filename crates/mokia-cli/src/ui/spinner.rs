//! Spinner shown while the server (re)starts.

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

/// Spinner for the load-and-bind step.
///
/// ```no_run
/// use mokia_cli::ui::Spinner;
///
/// let spinner = Spinner::new("Loading...");
/// spinner.finish("Server is listening on port 8080.");
/// ```
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create and start a new spinner.
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Finish with a green checkmark.
    pub fn finish(&self, message: &str) {
        let mark = if super::colors_enabled() {
            "✓".green().to_string()
        } else {
            "✓".to_string()
        };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }

    /// Finish with a red cross.
    pub fn fail(&self, message: &str) {
        let mark = if super::colors_enabled() {
            "✗".red().to_string()
        } else {
            "✗".to_string()
        };
        self.pb.finish_with_message(format!("{} {}", mark, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_creation() {
        let spinner = Spinner::new("Loading...");
        spinner.finish("Done");
    }

    #[test]
    fn test_spinner_fail() {
        let spinner = Spinner::new("Loading...");
        spinner.fail("Could not load");
    }
}
