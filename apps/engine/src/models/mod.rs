pub mod job;
pub mod student;

use serde::de::DeserializeOwned;
use tracing::warn;

/// Parses a JSON list column. A malformed column yields an empty list and a
/// warning rather than failing the read.
pub(crate) fn parse_json_list<T: DeserializeOwned>(column: &str, raw: &str, owner: &str) -> Vec<T> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!(column, owner, error = %e, "malformed JSON list column, treating as empty");
        Vec::new()
    })
}

/// Serializes a string list for a JSON column.
pub(crate) fn to_json_list(items: &[String]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}
