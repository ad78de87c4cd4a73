//! Status message functions for terminal output.

use owo_colors::OwoColorize;

fn emit(symbol: &str, colored: impl FnOnce() -> String, message: &str) {
    if super::colors_enabled() {
        eprintln!("{}", colored());
    } else {
        eprintln!("{} {}", symbol, message);
    }
}

/// Print a success message to stderr.
pub fn success(message: &str) {
    emit("✓", || format!("{} {}", "✓".green().bold(), message), message);
}

/// Print an info message to stderr.
pub fn info(message: &str) {
    emit("ℹ", || format!("{} {}", "ℹ".blue().bold(), message), message);
}

/// Print a warning message to stderr.
pub fn warning(message: &str) {
    emit(
        "⚠",
        || format!("{} {}", "⚠".yellow().bold(), message.yellow()),
        message,
    );
}

/// Print an error message to stderr.
pub fn error(message: &str) {
    emit(
        "✗",
        || format!("{} {}", "✗".red().bold(), message.red()),
        message,
    );
}

/// Print a lifecycle status line (`* message`) to stderr.
pub fn status(message: &str) {
    emit("*", || format!("{} {}", "*".yellow().bold(), message), message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        success("Success message");
        info("Info message");
        warning("Warning message");
        error("Error message");
        status("Status message");
    }
}
