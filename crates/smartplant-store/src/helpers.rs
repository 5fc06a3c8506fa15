//! Column parsing helpers.
//!
//! `refreshed_at` columns may hold either RFC 3339 text written by this crate
//! or `SQLite`'s `datetime('now')` format when a row was edited by hand.

use chrono::{DateTime, Utc};

use crate::error::StorageError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`).
///
/// # Errors
///
/// Returns `StorageError::Backend` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StorageError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| StorageError::Backend(format!("Failed to parse datetime '{s}': {e}")))
}

/// Rewrite a timestamp column into the RFC 3339 form the domain types expect.
///
/// Unparsable text is returned unchanged so the caller's record-level
/// validation decides what to do with it.
#[must_use]
pub fn canonical_timestamp(s: &str) -> String {
    parse_datetime(s).map_or_else(|_| s.to_string(), |dt| dt.to_rfc3339())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_and_sqlite_formats() {
        let a = parse_datetime("2026-02-09T14:30:00+00:00").unwrap();
        let b = parse_datetime("2026-02-09 14:30:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_datetime("yesterday").is_err());
    }

    #[test]
    fn canonical_timestamp_keeps_unparsable_text() {
        assert_eq!(canonical_timestamp("soon"), "soon");
        assert_eq!(
            canonical_timestamp("2026-02-09 14:30:00"),
            "2026-02-09T14:30:00+00:00"
        );
    }
}
