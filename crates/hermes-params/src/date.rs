//! Date parsing strategy for date-typed parameters.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default pattern used to parse date parameters.
pub const DEFAULT_DATE_PATTERN: &str = "%Y-%m-%dT%H:%M:%S";

/// A `chrono` strftime pattern used to parse date parameters.
///
/// Date-only patterns are accepted too; such values resolve to midnight.
///
/// # Example
///
/// ```rust
/// use hermes_params::DateFormat;
///
/// let format = DateFormat::new("%d.%m.%Y");
/// let parsed = format.parse("24.12.2024").unwrap();
/// assert_eq!(parsed.to_string(), "2024-12-24 00:00:00");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateFormat {
    pattern: String,
}

impl DateFormat {
    /// Creates a format from a strftime pattern.
    #[must_use]
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
        }
    }

    /// Returns the strftime pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parses `value` with this pattern.
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime, ParseError> {
        NaiveDateTime::parse_from_str(value, &self.pattern).or_else(|err| {
            NaiveDate::parse_from_str(value, &self.pattern)
                .map(|date| date.and_time(NaiveTime::MIN))
                .map_err(|_| err)
        })
    }

    /// Formats `value` with this pattern.
    #[must_use]
    pub fn format(&self, value: &NaiveDateTime) -> String {
        value.format(&self.pattern).to_string()
    }
}

impl Default for DateFormat {
    fn default() -> Self {
        Self::new(DEFAULT_DATE_PATTERN)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_default_pattern() {
        let parsed = DateFormat::default().parse("2024-03-15T10:20:30").unwrap();

        assert_eq!(parsed.year(), 2024);
        assert_eq!(parsed.month(), 3);
        assert_eq!(parsed.day(), 15);
        assert_eq!(parsed.hour(), 10);
        assert_eq!(parsed.second(), 30);
    }

    #[test]
    fn test_date_only_pattern_resolves_to_midnight() {
        let parsed = DateFormat::new("%Y-%m-%d").parse("2024-03-15").unwrap();

        assert_eq!(parsed.day(), 15);
        assert_eq!(parsed.hour(), 0);
        assert_eq!(parsed.minute(), 0);
    }

    #[test]
    fn test_unparsable_value() {
        assert!(DateFormat::default().parse("yesterday").is_err());
        assert!(DateFormat::default().parse("2024-13-01T00:00:00").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let format = DateFormat::default();
        let parsed = format.parse("2024-03-15T10:20:30").unwrap();

        assert_eq!(format.format(&parsed), "2024-03-15T10:20:30");
    }

    #[test]
    fn test_serde_transparent() {
        let format: DateFormat = serde_json::from_str("\"%d/%m/%Y\"").unwrap();
        assert_eq!(format.pattern(), "%d/%m/%Y");
    }
}
