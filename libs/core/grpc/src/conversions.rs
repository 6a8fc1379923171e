//! Protobuf ↔ domain conversions
//!
//! Timestamps travel as RFC 3339 strings in UTC with microsecond precision
//! (`2025-01-01T12:00:00.123456Z`), which is also what the REST API emits.
//!
//! ```ignore
//! use grpc_client::conversions::*;
//! use chrono::Utc;
//!
//! let text = datetime_to_rfc3339(Utc::now());
//! let back = rfc3339_to_datetime(&text)?;
//! ```

use chrono::{DateTime, SecondsFormat, Utc};

/// Format as RFC 3339 with a `Z` suffix and six fractional digits
pub fn datetime_to_rfc3339(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse any RFC 3339 timestamp and normalize it to UTC
pub fn rfc3339_to_datetime(value: &str) -> Result<DateTime<Utc>, String> {
  DateTime::parse_from_rfc3339(value)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| format!("Invalid RFC 3339 timestamp '{}': {}", value, e))
}
