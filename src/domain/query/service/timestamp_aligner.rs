use chrono::DateTime;
use tracing::debug;

use crate::domain::query::model::{AlignedTimeRange, TimeRange};
use crate::errors::ResolveError;

/// Timestamp as handed over by a caller: epoch seconds, either numeric or as text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTimestamp<'a> {
    Text(&'a str),
    Seconds(f64),
    WholeSeconds(i64),
}

impl<'a> From<&'a str> for RawTimestamp<'a> {
    fn from(value: &'a str) -> Self {
        RawTimestamp::Text(value)
    }
}

impl<'a> From<&'a String> for RawTimestamp<'a> {
    fn from(value: &'a String) -> Self {
        RawTimestamp::Text(value.as_str())
    }
}

impl From<f64> for RawTimestamp<'_> {
    fn from(value: f64) -> Self {
        RawTimestamp::Seconds(value)
    }
}

impl From<i64> for RawTimestamp<'_> {
    fn from(value: i64) -> Self {
        RawTimestamp::WholeSeconds(value)
    }
}

/// Floors timestamps onto a fixed grid of `unit_secs` seconds.
///
/// Two inputs inside the same bucket always produce the same output, and aligned
/// values are fixed points.
#[derive(Debug, Clone)]
pub struct TimestampAligner {
    unit_secs: i64,
}

impl Default for TimestampAligner {
    fn default() -> Self {
        Self { unit_secs: 1 }
    }
}

impl TimestampAligner {
    pub fn new(unit_secs: u64) -> Self {
        Self {
            unit_secs: i64::try_from(unit_secs.max(1)).unwrap_or(i64::MAX),
        }
    }

    pub fn unit_secs(&self) -> u64 {
        self.unit_secs as u64
    }

    /// Parses and floors one timestamp. Inputs whose grid bucket starts below
    /// `i64::MIN` are rejected rather than wrapped.
    pub fn align<'a>(&self, raw: impl Into<RawTimestamp<'a>>) -> Result<i64, ResolveError> {
        let raw = raw.into();
        let seconds = match raw {
            RawTimestamp::WholeSeconds(s) => s,
            RawTimestamp::Seconds(s) => seconds_from_float(s)
                .ok_or_else(|| ResolveError::InvalidTimestamp(s.to_string()))?,
            RawTimestamp::Text(text) => parse_text(text)?,
        };
        self.checked_align_seconds(seconds).ok_or_else(|| {
            ResolveError::InvalidTimestamp(match raw {
                RawTimestamp::Text(text) => text.to_string(),
                _ => seconds.to_string(),
            })
        })
    }

    pub fn checked_align_seconds(&self, seconds: i64) -> Option<i64> {
        seconds.div_euclid(self.unit_secs).checked_mul(self.unit_secs)
    }

    /// Like [`checked_align_seconds`](Self::checked_align_seconds), but a bucket that
    /// starts below `i64::MIN` is replaced by the lowest representable grid point.
    pub fn align_seconds(&self, seconds: i64) -> i64 {
        self.checked_align_seconds(seconds).unwrap_or_else(|| {
            (seconds.div_euclid(self.unit_secs) + 1).saturating_mul(self.unit_secs)
        })
    }

    /// Aligns and orders both bounds. A zero-width result is returned as-is.
    pub fn align_range<'a, 'b>(
        &self,
        start: impl Into<RawTimestamp<'a>>,
        end: impl Into<RawTimestamp<'b>>,
    ) -> Result<AlignedTimeRange, ResolveError> {
        let start = self.align(start)?;
        let end = self.align(end)?;
        Ok(AlignedTimeRange::from_aligned(TimeRange::new(start, end)))
    }

    pub fn align_time_range(&self, range: TimeRange) -> AlignedTimeRange {
        AlignedTimeRange::from_aligned(TimeRange::new(
            self.align_seconds(range.start_seconds),
            self.align_seconds(range.end_seconds),
        ))
    }
}

fn seconds_from_float(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if floored < i64::MIN as f64 || floored >= i64::MAX as f64 {
        return None;
    }
    Some(floored as i64)
}

fn parse_text(text: &str) -> Result<i64, ResolveError> {
    let trimmed = text.trim();

    if let Ok(whole) = trimmed.parse::<i64>() {
        return Ok(whole);
    }
    if let Some(seconds) = trimmed.parse::<f64>().ok().and_then(seconds_from_float) {
        return Ok(seconds);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        debug!(input = trimmed, "timestamp parsed as RFC 3339");
        return Ok(dt.timestamp());
    }

    Err(ResolveError::InvalidTimestamp(text.to_string()))
}
