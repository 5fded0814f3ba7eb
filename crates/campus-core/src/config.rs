//! Environment helpers for service configuration structs.

use std::str::FromStr;

/// Read and parse `key`, falling back to `default` when unset or unparsable.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a comma-separated list; unset yields an empty list.
pub fn env_list(key: &str) -> Vec<String> {
    std::env::var(key)
        .map(|v| parse_list(&v))
        .unwrap_or_default()
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}
