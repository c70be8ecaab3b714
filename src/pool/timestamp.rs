//! `last_included` timestamps.
//!
//! Accepted input forms, all interpreted in UTC unless an offset is given:
//!
//! | Form                            | Example                       |
//! |---------------------------------|-------------------------------|
//! | RFC 3339                        | `2025-01-31T08:15:00+02:00`   |
//! | Naive date-time (opt. fraction) | `2025-01-31T08:15:00.123456`  |
//! | Plain date                      | `2025-01-31` (midnight)       |
//!
//! The text is kept as read, so an untouched timestamp is written back
//! byte-for-byte. Fresh stamps are RFC 3339 UTC with seconds precision.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, de};
use std::fmt;

#[derive(Debug, Clone)]
pub struct Timestamp {
    at: DateTime<Utc>,
    raw: String,
}

impl Timestamp {
    /// Stamp for `at`, formatted as `2025-01-31T08:15:00Z`.
    pub fn new(at: DateTime<Utc>) -> Self {
        Self {
            at,
            raw: at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    /// Parse any accepted form, keeping the original text.
    pub fn parse(s: &str) -> Option<Self> {
        parse_datetime(s).map(|at| Self {
            at,
            raw: s.to_owned(),
        })
    }

    #[inline]
    pub const fn at(&self) -> DateTime<Utc> {
        self.at
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl PartialEq for Timestamp {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).ok_or_else(|| {
            de::Error::custom(format!(
                "invalid `last_included` timestamp `{raw}`, expected ISO-8601"
            ))
        })
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
