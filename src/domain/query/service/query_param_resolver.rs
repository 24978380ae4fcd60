use tracing::debug;

use crate::config::ResolverConfig;
use crate::domain::query::model::{AlignedTimeRange, QueryParams, TimeRange};
use crate::domain::query::service::rate_interval_calculator::RateIntervalCalculator;
use crate::domain::query::service::resolution_selector::ResolutionSelector;
use crate::domain::query::service::step_calculator::StepCalculator;
use crate::domain::query::service::timestamp_aligner::{RawTimestamp, TimestampAligner};
use crate::errors::ResolveError;

/// Caller input for one resolution. Unset knobs fall back to the resolver config.
#[derive(Debug, Clone, Copy)]
pub struct QueryRequest<'a> {
    pub start: RawTimestamp<'a>,
    pub end: RawTimestamp<'a>,
    pub target_points: Option<u32>,
    pub jitter_units: i64,
    pub scrape_interval_secs: Option<u64>,
}

impl<'a> QueryRequest<'a> {
    pub fn new(start: impl Into<RawTimestamp<'a>>, end: impl Into<RawTimestamp<'a>>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            target_points: None,
            jitter_units: 0,
            scrape_interval_secs: None,
        }
    }

    pub fn with_target_points(mut self, target_points: u32) -> Self {
        self.target_points = Some(target_points);
        self
    }

    pub fn with_jitter_units(mut self, jitter_units: i64) -> Self {
        self.jitter_units = jitter_units;
        self
    }

    pub fn with_scrape_interval(mut self, scrape_interval_secs: u64) -> Self {
        self.scrape_interval_secs = Some(scrape_interval_secs);
        self
    }
}

/// Aligner → step → resolution, plus the independent rate window.
///
/// Stateless; one instance is shared across all request handlers.
#[derive(Debug, Clone)]
pub struct QueryParamResolver {
    config: ResolverConfig,
    aligner: TimestampAligner,
    steps: StepCalculator,
    resolutions: ResolutionSelector,
    rates: RateIntervalCalculator,
}

impl Default for QueryParamResolver {
    fn default() -> Self {
        Self::new(ResolverConfig::default())
    }
}

impl QueryParamResolver {
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            aligner: TimestampAligner::new(config.alignment_secs),
            steps: StepCalculator::from_config(&config),
            resolutions: ResolutionSelector::from_config(&config),
            rates: RateIntervalCalculator::from_config(&config),
            config,
        }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn aligner(&self) -> &TimestampAligner {
        &self.aligner
    }

    pub fn resolve(&self, request: QueryRequest<'_>) -> Result<QueryParams, ResolveError> {
        let range = self.aligner.align_range(request.start, request.end)?;
        Ok(self.resolve_aligned(
            range,
            request.target_points,
            request.jitter_units,
            request.scrape_interval_secs,
        ))
    }

    /// Same as [`resolve`](Self::resolve) for a range already held as seconds.
    pub fn resolve_range(
        &self,
        range: TimeRange,
        target_points: Option<u32>,
        jitter_units: i64,
        scrape_interval_secs: Option<u64>,
    ) -> QueryParams {
        let aligned = self.aligner.align_time_range(range);
        self.resolve_aligned(aligned, target_points, jitter_units, scrape_interval_secs)
    }

    fn resolve_aligned(
        &self,
        range: AlignedTimeRange,
        target_points: Option<u32>,
        jitter_units: i64,
        scrape_interval_secs: Option<u64>,
    ) -> QueryParams {
        let range = self.widen_if_empty(range);
        let target_points = target_points.unwrap_or(self.config.step_target_points);
        let scrape_interval_secs = scrape_interval_secs.unwrap_or(self.config.scrape_interval_secs);

        let step = self
            .steps
            .compute_step_for_range(&range, target_points, jitter_units);
        let resolution = self
            .resolutions
            .select_durations(step.base(), range.duration());
        let rate_interval = self.rates.compute_rate_interval(
            range.start_seconds(),
            range.end_seconds(),
            scrape_interval_secs,
            self.config.rate_target_points,
        );

        debug!(
            start = range.start_seconds(),
            end = range.end_seconds(),
            step = %step,
            resolution = %resolution.as_token(),
            rate_interval = %rate_interval,
            "resolved query parameters"
        );

        QueryParams {
            range,
            step,
            resolution,
            rate_interval,
        }
    }

    /// A zero-width window is widened to `min_range_secs` centred on the point, then
    /// re-aligned outwards.
    fn widen_if_empty(&self, range: AlignedTimeRange) -> AlignedTimeRange {
        if !range.as_range().is_empty() || self.config.min_range_secs == 0 {
            return range;
        }
        let min_range = i64::try_from(self.config.min_range_secs).unwrap_or(i64::MAX);
        let before = min_range / 2;
        let point = range.start_seconds();

        let start = self.aligner.align_seconds(point.saturating_sub(before));
        let end = point.saturating_add(min_range - before);
        // align_seconds floors, so round the widened end up to keep the full width
        let unit = i64::try_from(self.aligner.unit_secs()).unwrap_or(i64::MAX);
        let aligned_end = match self.aligner.align_seconds(end) {
            e if e < end => e.saturating_add(unit),
            e => e,
        };
        self.aligner
            .align_time_range(TimeRange::new(start, aligned_end))
    }
}
