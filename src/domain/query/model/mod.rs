//! Value types flowing through the query-parameter pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::util::query_duration::QueryDuration;

/// Closed interval of epoch seconds with `end_seconds >= start_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    pub start_seconds: i64,
    pub end_seconds: i64,
}

impl TimeRange {
    /// Reversed bounds are swapped rather than rejected.
    pub fn new(start_seconds: i64, end_seconds: i64) -> Self {
        Self {
            start_seconds: start_seconds.min(end_seconds),
            end_seconds: start_seconds.max(end_seconds),
        }
    }

    pub fn duration_seconds(&self) -> u64 {
        self.end_seconds.abs_diff(self.start_seconds)
    }

    pub fn duration(&self) -> QueryDuration {
        QueryDuration::from_millis(self.duration_seconds().saturating_mul(1_000))
    }

    pub fn is_empty(&self) -> bool {
        self.start_seconds == self.end_seconds
    }
}

/// A [`TimeRange`] whose bounds sit on the alignment grid.
///
/// Only the timestamp aligner builds these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AlignedTimeRange(TimeRange);

impl AlignedTimeRange {
    pub(crate) fn from_aligned(range: TimeRange) -> Self {
        Self(range)
    }

    pub fn start_seconds(&self) -> i64 {
        self.0.start_seconds
    }

    pub fn end_seconds(&self) -> i64 {
        self.0.end_seconds
    }

    pub fn duration(&self) -> QueryDuration {
        self.0.duration()
    }

    pub fn as_range(&self) -> TimeRange {
        self.0
    }
}

/// Sampling interval of a range query.
///
/// `base` is always a rung of the step ladder; `effective` is `base` shifted by the
/// caller's bounded jitter and is what gets sent to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StepDuration {
    base: QueryDuration,
    effective: QueryDuration,
}

impl StepDuration {
    pub(crate) fn new(base: QueryDuration, effective: QueryDuration) -> Self {
        Self { base, effective }
    }

    pub fn base(&self) -> QueryDuration {
        self.base
    }

    pub fn effective(&self) -> QueryDuration {
        self.effective
    }

    pub fn as_millis(&self) -> u64 {
        self.effective.as_millis()
    }

    pub fn is_jittered(&self) -> bool {
        self.base != self.effective
    }
}

/// Serialized as the `step` parameter, e.g. `"30000ms"`.
impl fmt::Display for StepDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.effective.as_millis())
    }
}

impl Serialize for StepDuration {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Pre-aggregated storage granularity, ordered finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionTier {
    Raw,
    Medium,
    Coarse,
}

impl ResolutionTier {
    pub fn max_source_resolution(self) -> QueryDuration {
        match self {
            ResolutionTier::Raw => QueryDuration::ZERO,
            ResolutionTier::Medium => QueryDuration::from_mins(5),
            ResolutionTier::Coarse => QueryDuration::from_hours(1),
        }
    }

    /// `"0s"`, `"5m"` or `"1h"`.
    pub fn as_token(self) -> String {
        self.max_source_resolution().to_compact_token()
    }
}

/// Window of a `rate()`/`increase()` aggregation, rendered as `"5m"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RateInterval(QueryDuration);

impl RateInterval {
    pub(crate) fn new(window: QueryDuration) -> Self {
        Self(window)
    }

    pub fn window(&self) -> QueryDuration {
        self.0
    }
}

impl fmt::Display for RateInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Everything the range-query client needs for one chart query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QueryParams {
    pub range: AlignedTimeRange,
    pub step: StepDuration,
    pub resolution: ResolutionTier,
    pub rate_interval: RateInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_range_orders_bounds() {
        let range = TimeRange::new(200, 100);
        assert_eq!(range.start_seconds, 100);
        assert_eq!(range.end_seconds, 200);
        assert_eq!(range.duration_seconds(), 100);
        assert_eq!(range.duration(), QueryDuration::from_secs(100));
    }

    #[test]
    fn tiers_are_ordered_and_encoded() {
        assert!(ResolutionTier::Raw < ResolutionTier::Medium);
        assert!(ResolutionTier::Medium < ResolutionTier::Coarse);
        assert_eq!(ResolutionTier::Raw.as_token(), "0s");
        assert_eq!(ResolutionTier::Medium.as_token(), "5m");
        assert_eq!(ResolutionTier::Coarse.as_token(), "1h");
    }

    #[test]
    fn step_serializes_effective_millis() {
        let step = StepDuration::new(QueryDuration::from_secs(30), QueryDuration::from_millis(30_500));
        assert_eq!(step.to_string(), "30500ms");
        assert!(step.is_jittered());
        assert_eq!(serde_json::to_string(&step).unwrap(), "\"30500ms\"");
    }
}
