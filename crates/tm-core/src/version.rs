//! Migration version: a 14-digit `yyyyMMddHHmmss` timestamp.

use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of characters in a version prefix.
pub const VERSION_LEN: usize = 14;

const VERSION_FORMAT: &str = "%Y%m%d%H%M%S";

/// Ordering key of a migration script.
///
/// Versions compare chronologically. The textual form is always the
/// 14-digit `yyyyMMddHHmmss` rendering, which is also what gets stored in a
/// target's `last_run_migration` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(NaiveDateTime);

impl Version {
    /// High-water mark of a target that has never recorded a run.
    pub const EPOCH: Version = Version(DateTime::<Utc>::UNIX_EPOCH.naive_utc());

    /// Parse a 14-digit version string.
    pub fn parse(value: &str) -> CoreResult<Self> {
        let invalid = |reason: &str| CoreError::InvalidVersion {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        if value.len() != VERSION_LEN {
            return Err(invalid("expected exactly 14 digits (yyyyMMddHHmmss)"));
        }
        // chrono accepts a leading sign on %Y, so digits are checked up front
        if !value.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected exactly 14 digits (yyyyMMddHHmmss)"));
        }

        let datetime = NaiveDateTime::parse_from_str(value, VERSION_FORMAT)
            .map_err(|e| invalid(&format!("not a valid timestamp: {e}")))?;
        // chrono reads second 60 as a leap second
        if datetime.nanosecond() >= 1_000_000_000 {
            return Err(invalid("seconds must be between 00 and 59"));
        }
        Ok(Self(datetime))
    }

    /// Build a version from a calendar date-time, truncated to whole seconds.
    ///
    /// Returns `None` for years that do not fit in four digits.
    pub fn from_datetime(datetime: NaiveDateTime) -> Option<Self> {
        if !(0..=9999).contains(&datetime.year()) {
            return None;
        }
        datetime.with_nanosecond(0).map(Self)
    }

    /// The underlying date-time.
    pub fn as_datetime(&self) -> NaiveDateTime {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::EPOCH
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(VERSION_FORMAT))
    }
}

impl FromStr for Version {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        Self::parse(s)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "version_test.rs"]
mod tests;
