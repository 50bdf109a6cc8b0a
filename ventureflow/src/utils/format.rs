//! Formatting helpers for timestamps and human-readable factor strings.

use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a UTC timestamp as RFC 3339 with microseconds.
#[must_use]
pub fn rfc3339(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Returns the current UTC time as RFC 3339.
#[must_use]
pub fn iso_timestamp() -> String {
    rfc3339(&Utc::now())
}

/// Formats an integer with comma thousands separators (`12345` -> `"12,345"`).
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
