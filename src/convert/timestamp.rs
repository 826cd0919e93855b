//! Timestamp parsing with strftime-style patterns

use crate::error::{Error, Result};
use crate::schema::{DEFAULT_TIMESTAMP_FORMAT, DEFAULT_TIMEZONE};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Rewrite `%L` (milliseconds) and `%N` (fraction) into chrono specifiers
///
/// A dot directly before either is folded into chrono's dotted form, which
/// accepts any number of fraction digits when parsing.
pub fn translate_pattern(pattern: &str) -> String {
    pattern
        .replace(".%L", "%.3f")
        .replace(".%N", "%.f")
        .replace("%L", "%3f")
        .replace("%N", "%9f")
}

/// Parser for one timestamp column
#[derive(Debug, Clone)]
pub struct TimestampParser {
    pattern: String,
    timezone: Tz,
}

impl Default for TimestampParser {
    fn default() -> Self {
        Self {
            pattern: translate_pattern(DEFAULT_TIMESTAMP_FORMAT),
            timezone: Tz::UTC,
        }
    }
}

impl TimestampParser {
    /// Create a parser, failing on an unknown timezone name
    pub fn new(pattern: Option<&str>, timezone: Option<&str>) -> Result<Self> {
        let pattern = translate_pattern(pattern.unwrap_or(DEFAULT_TIMESTAMP_FORMAT));
        let timezone = parse_timezone(timezone.unwrap_or(DEFAULT_TIMEZONE))?;
        Ok(Self { pattern, timezone })
    }

    /// chrono pattern in use
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Parse `value`, returning `None` when it does not match the pattern
    ///
    /// Values with an offset keep it; values without one are read in the
    /// parser's timezone. A date-only pattern yields midnight.
    pub fn parse(&self, value: &str) -> Option<DateTime<Utc>> {
        let value = value.trim();

        if let Ok(parsed) = DateTime::parse_from_str(&normalize_zulu(value), &self.pattern) {
            return Some(parsed.with_timezone(&Utc));
        }

        let naive = NaiveDateTime::parse_from_str(value, &self.pattern)
            .ok()
            .or_else(|| {
                NaiveDate::parse_from_str(value, &self.pattern)
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })?;

        self.timezone
            .from_local_datetime(&naive)
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}

/// Resolve an IANA timezone name
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::config(format!("Unknown timezone '{name}'")))
}

/// Treat a trailing `Z` as `+0000`
fn normalize_zulu(value: &str) -> String {
    match value.strip_suffix('Z') {
        Some(rest) => format!("{rest}+0000"),
        None => value.to_string(),
    }
}
