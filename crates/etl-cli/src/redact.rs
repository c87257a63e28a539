//! Scrubbing dataset error messages before they are logged.
//!
//! Database-backed datasets report the failing statement and its bound
//! parameters on lines of their own. Statements are truncated and parameters
//! are dropped; other lines pass through.

/// Longest statement prefix kept from an `[SQL: ...]` line.
pub const MAX_SQL_CHARS: usize = 1000;

const SQL_PREFIX: &str = "[SQL:";
const PARAMETERS_PREFIX: &str = "[parameters:";
const REDACTED_PARAMETERS: &str = "[parameters: <REDACTED>]";

/// Redact one line of a dataset error message.
pub fn redact_line(line: &str) -> String {
    if line.starts_with(SQL_PREFIX) {
        let mut kept: String = line.chars().take(MAX_SQL_CHARS).collect();
        kept.push_str("...");
        kept
    } else if line.starts_with(PARAMETERS_PREFIX) {
        REDACTED_PARAMETERS.to_string()
    } else {
        line.to_string()
    }
}

/// Redact every line of a dataset error message.
pub fn redact_dataset_error(message: &str) -> String {
    message
        .split('\n')
        .map(redact_line)
        .collect::<Vec<_>>()
        .join("\n")
}
