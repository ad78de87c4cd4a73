//! Value parsers for command-line arguments.

use mokia_graph::{split_list, RouteKey};
use regex::Regex;
use std::time::Duration;

/// Route keys given with `--priority`, normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityList(pub Vec<String>);

/// Compiled `--ignore` pattern; `None` when given as an empty string.
#[derive(Debug, Clone)]
pub struct IgnorePattern(pub Option<Regex>);

/// Parse a comma-separated list of route keys.
///
/// Each entry must be `METHOD /path` or `/path`; methods are upper-cased.
///
/// # Errors
///
/// Returns an error message naming the first malformed entry.
pub fn parse_priority(s: &str) -> Result<PriorityList, String> {
    split_list(s)
        .iter()
        .map(|entry| {
            RouteKey::parse(entry)
                .map(|key| key.to_string())
                .map_err(|reason| format!("invalid route '{}': {}", entry, reason))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(PriorityList)
}

/// Parse a whole number of milliseconds.
pub fn parse_millis(s: &str) -> Result<Duration, String> {
    s.trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| format!("expected a number of milliseconds, got '{}'", s))
}

/// Compile the ignore regex. An empty pattern disables ignoring.
pub fn parse_ignore(s: &str) -> Result<IgnorePattern, String> {
    if s.is_empty() {
        return Ok(IgnorePattern(None));
    }
    Regex::new(s)
        .map(|re| IgnorePattern(Some(re)))
        .map_err(|e| e.to_string())
}
