//! Millisecond duration value used for steps, rate windows and resolution hints.
//!
//! Two string encodings are supported at the boundary:
//! - compact token (`"30s"`, `"5m"`, `"1h"`, `"0s"`), the largest unit that divides exactly
//! - millisecond token (`"30000ms"`), the form the range-query `step` parameter expects
//!
//! Parsing accepts both plus Prometheus-style composites such as `"1h30m"`.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;
const MS_PER_WEEK: u64 = 7 * MS_PER_DAY;

/// Units ordered from largest to smallest.
const UNITS: [(&str, u64); 6] = [
    ("w", MS_PER_WEEK),
    ("d", MS_PER_DAY),
    ("h", MS_PER_HOUR),
    ("m", MS_PER_MINUTE),
    ("s", MS_PER_SECOND),
    ("ms", 1),
];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration token")]
    Empty,

    #[error("invalid duration token '{0}'")]
    Invalid(String),

    #[error("unknown duration unit '{unit}' in '{token}'")]
    UnknownUnit { token: String, unit: String },

    #[error("duration units out of order in '{0}'")]
    UnitOrder(String),

    #[error("duration '{0}' overflows")]
    Overflow(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct QueryDuration(u64);

impl QueryDuration {
    pub const ZERO: QueryDuration = QueryDuration(0);

    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * MS_PER_SECOND)
    }

    pub const fn from_mins(mins: u64) -> Self {
        Self(mins * MS_PER_MINUTE)
    }

    pub const fn from_hours(hours: u64) -> Self {
        Self(hours * MS_PER_HOUR)
    }

    pub const fn from_days(days: u64) -> Self {
        Self(days * MS_PER_DAY)
    }

    #[inline]
    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Whole seconds, truncated.
    #[inline]
    pub const fn as_secs(self) -> u64 {
        self.0 / MS_PER_SECOND
    }

    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn as_std(self) -> Duration {
        Duration::from_millis(self.0)
    }

    /// `"30000ms"` form.
    pub fn to_millis_token(self) -> String {
        format!("{}ms", self.0)
    }

    /// `"5m"` form. Same as `Display`.
    pub fn to_compact_token(self) -> String {
        self.to_string()
    }
}

impl From<Duration> for QueryDuration {
    fn from(value: Duration) -> Self {
        Self(u64::try_from(value.as_millis()).unwrap_or(u64::MAX))
    }
}

impl fmt::Display for QueryDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return f.write_str("0s");
        }
        for (unit, ms) in UNITS {
            if self.0 % ms == 0 {
                return write!(f, "{}{}", self.0 / ms, unit);
            }
        }
        unreachable!("every value is divisible by 1ms")
    }
}

impl FromStr for QueryDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        if token.is_empty() {
            return Err(DurationParseError::Empty);
        }

        let mut rest = token;
        let mut total: u64 = 0;
        // index into UNITS of the last unit seen; next unit must be strictly smaller
        let mut last_unit: Option<usize> = None;

        while !rest.is_empty() {
            let digits_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .ok_or_else(|| DurationParseError::Invalid(token.to_string()))?;
            if digits_end == 0 {
                return Err(DurationParseError::Invalid(token.to_string()));
            }
            let value: u64 = rest[..digits_end]
                .parse()
                .map_err(|_| DurationParseError::Overflow(token.to_string()))?;
            rest = &rest[digits_end..];

            let unit_end = rest
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(rest.len());
            let unit = &rest[..unit_end];
            rest = &rest[unit_end..];

            let unit_idx = UNITS
                .iter()
                .position(|(name, _)| *name == unit)
                .ok_or_else(|| DurationParseError::UnknownUnit {
                    token: token.to_string(),
                    unit: unit.to_string(),
                })?;

            if let Some(prev) = last_unit {
                if unit_idx <= prev {
                    return Err(DurationParseError::UnitOrder(token.to_string()));
                }
            }
            last_unit = Some(unit_idx);

            total = value
                .checked_mul(UNITS[unit_idx].1)
                .and_then(|ms| total.checked_add(ms))
                .ok_or_else(|| DurationParseError::Overflow(token.to_string()))?;
        }

        Ok(Self(total))
    }
}

impl serde::Serialize for QueryDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for QueryDuration {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
