//! Formatting for durations and request log lines.

use owo_colors::OwoColorize;
use std::time::Duration;

/// Format duration in human-readable format.
///
/// ```
/// use std::time::Duration;
/// use mokia_cli::ui::format_duration;
///
/// assert_eq!(format_duration(Duration::from_millis(50)), "50ms");
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
/// ```
pub fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();

    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else if total_ms < 60_000 {
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs();
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

/// Format one request log line, e.g. `GET /users 200 3ms`.
pub fn format_request(method: &str, path: &str, status: u16, elapsed: Duration) -> String {
    let elapsed = format_duration(elapsed);
    if !super::colors_enabled() {
        return format!("{} {} {} {}", method, path, status, elapsed);
    }

    let status = match status {
        200..=299 => status.green().to_string(),
        300..=399 => status.cyan().to_string(),
        400..=499 => status.yellow().to_string(),
        _ => status.red().to_string(),
    };
    format!("{} {} {} {}", method.bold(), path, status, elapsed.dimmed())
}

/// Print a request log line to stderr.
pub fn request(method: &str, path: &str, status: u16, elapsed: Duration) {
    eprintln!("{}", format_request(method, path, status, elapsed));
}
