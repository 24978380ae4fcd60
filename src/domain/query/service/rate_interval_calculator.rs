use tracing::warn;

use crate::config::ResolverConfig;
use crate::core::util::ladder::Ladder;
use crate::core::util::query_duration::QueryDuration;
use crate::domain::query::model::RateInterval;

pub const DEFAULT_SCRAPE_INTERVAL_SECS: u64 = 15;
pub const DEFAULT_RATE_TARGET_POINTS: u32 = 200;

/// A rate window must cover at least this many scrapes.
pub const MIN_SCRAPES_PER_WINDOW: u64 = 4;

#[derive(Debug, Clone)]
pub struct RateIntervalCalculator {
    ladder: Ladder,
}

impl Default for RateIntervalCalculator {
    fn default() -> Self {
        Self::new(Ladder::default_rate())
    }
}

impl RateIntervalCalculator {
    pub fn new(ladder: Ladder) -> Self {
        Self { ladder }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(config.rate_ladder.clone())
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn compute_rate_interval(
        &self,
        start_seconds: i64,
        end_seconds: i64,
        scrape_interval_secs: u64,
        target_points: u32,
    ) -> RateInterval {
        let duration_ms = end_seconds
            .saturating_sub(start_seconds)
            .max(0)
            .unsigned_abs()
            .saturating_mul(1_000);

        let floor_ms = scrape_interval_secs
            .saturating_mul(MIN_SCRAPES_PER_WINDOW)
            .saturating_mul(1_000);
        let min_window_ms = floor_ms.max(self.ladder.min().as_millis());
        let desired_ms = min_window_ms.max(duration_ms.div_ceil(u64::from(target_points.max(1))));

        let window = self.ladder.snap_up(desired_ms);
        if window.as_millis() < floor_ms {
            // only reachable when 4 scrapes outgrow the whole ladder
            warn!(
                scrape_interval_secs,
                ladder_max = %self.ladder.max(),
                "scrape interval exceeds rate ladder; using scrape floor as rate window"
            );
            return RateInterval::new(QueryDuration::from_millis(floor_ms));
        }

        RateInterval::new(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_704_067_200;

    fn compute(start: i64, end: i64) -> RateInterval {
        RateIntervalCalculator::default().compute_rate_interval(
            start,
            end,
            DEFAULT_SCRAPE_INTERVAL_SECS,
            DEFAULT_RATE_TARGET_POINTS,
        )
    }

    #[test]
    fn one_hour_range() {
        assert_eq!(compute(START, 1_704_070_800).to_string(), "1m");
    }

    #[test]
    fn seven_day_range() {
        assert_eq!(compute(START, 1_704_672_000).to_string(), "1h");
    }

    #[test]
    fn one_minute_range_keeps_the_floor() {
        assert_eq!(compute(START, 1_704_067_260).to_string(), "1m");
    }

    #[test]
    fn negative_range_degrades_to_smallest_window() {
        assert_eq!(compute(START, START - 3_600).to_string(), "1m");
    }

    #[test]
    fn scrape_interval_raises_the_floor() {
        let calc = RateIntervalCalculator::default();
        // 4 x 60s = 4m -> 5m
        let interval = calc.compute_rate_interval(START, START + 3_600, 60, 200);
        assert_eq!(interval.to_string(), "5m");
        // 4 x 4h exceeds the ladder; floor wins
        let interval = calc.compute_rate_interval(START, START + 3_600, 4 * 3_600, 200);
        assert_eq!(interval.window(), QueryDuration::from_hours(16));
    }

    #[test]
    fn long_ranges_cap_at_largest_window() {
        let interval = compute(0, 10 * 365 * 24 * 3_600);
        assert_eq!(interval.to_string(), "12h");
    }

    #[test]
    fn output_is_a_ladder_member_above_the_floor() {
        let calc = RateIntervalCalculator::default();
        for scrape in [0, 5, 15, 30, 60, 300] {
            for hours in [0, 1, 3, 12, 24, 72, 168, 720] {
                let interval = calc.compute_rate_interval(START, START + hours * 3_600, scrape, 200);
                assert!(calc.ladder().contains(interval.window()));
                assert!(interval.window().as_millis() >= MIN_SCRAPES_PER_WINDOW * scrape * 1_000);
                let parsed: QueryDuration = interval.to_string().parse().unwrap();
                assert_eq!(parsed, interval.window());
            }
        }
    }
}
