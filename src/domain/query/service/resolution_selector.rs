use crate::config::ResolverConfig;
use crate::core::util::query_duration::QueryDuration;
use crate::domain::query::model::ResolutionTier;

/// Chooses the downsampled storage tier for a query.
///
/// The step and the absolute range are classified independently and the coarser
/// tier wins, so a long window never reads raw samples just because the caller
/// asked for a fine step.
#[derive(Debug, Clone)]
pub struct ResolutionSelector {
    step_raw_below: u64,
    step_medium_below: u64,
    range_raw_below: u64,
    range_medium_max: u64,
}

impl Default for ResolutionSelector {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl ResolutionSelector {
    pub fn from_config(config: &ResolverConfig) -> Self {
        Self {
            step_raw_below: config.step_raw_below.as_millis(),
            step_medium_below: config.step_medium_below.as_millis(),
            range_raw_below: config.range_raw_below.as_millis(),
            range_medium_max: config.range_medium_max.as_millis(),
        }
    }

    pub fn select(&self, step_ms: u64, range_ms: u64) -> ResolutionTier {
        self.by_step(step_ms).max(self.by_range(range_ms))
    }

    pub fn select_durations(&self, step: QueryDuration, range: QueryDuration) -> ResolutionTier {
        self.select(step.as_millis(), range.as_millis())
    }

    pub fn by_step(&self, step_ms: u64) -> ResolutionTier {
        if step_ms < self.step_raw_below {
            ResolutionTier::Raw
        } else if step_ms < self.step_medium_below {
            ResolutionTier::Medium
        } else {
            ResolutionTier::Coarse
        }
    }

    pub fn by_range(&self, range_ms: u64) -> ResolutionTier {
        if range_ms < self.range_raw_below {
            ResolutionTier::Raw
        } else if range_ms <= self.range_medium_max {
            ResolutionTier::Medium
        } else {
            ResolutionTier::Coarse
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR_MS: u64 = 3_600_000;
    const DAY_MS: u64 = 24 * HOUR_MS;

    #[test]
    fn step_thresholds() {
        let selector = ResolutionSelector::default();
        assert_eq!(selector.by_step(30_000), ResolutionTier::Raw);
        assert_eq!(selector.by_step(149_999), ResolutionTier::Raw);
        assert_eq!(selector.by_step(150_000), ResolutionTier::Medium);
        assert_eq!(selector.by_step(1_799_999), ResolutionTier::Medium);
        assert_eq!(selector.by_step(1_800_000), ResolutionTier::Coarse);
    }

    #[test]
    fn range_thresholds() {
        let selector = ResolutionSelector::default();
        assert_eq!(selector.by_range(12 * HOUR_MS - 1), ResolutionTier::Raw);
        assert_eq!(selector.by_range(12 * HOUR_MS), ResolutionTier::Medium);
        assert_eq!(selector.by_range(7 * DAY_MS), ResolutionTier::Medium);
        assert_eq!(selector.by_range(7 * DAY_MS + 1), ResolutionTier::Coarse);
    }

    #[test]
    fn coarser_signal_wins() {
        let selector = ResolutionSelector::default();
        // fine step over a long range
        assert_eq!(selector.select(30_000, 30 * DAY_MS), ResolutionTier::Coarse);
        // coarse step over a short range
        assert_eq!(selector.select(HOUR_MS, HOUR_MS), ResolutionTier::Coarse);
        assert_eq!(selector.select(300_000, HOUR_MS), ResolutionTier::Medium);
        assert_eq!(selector.select(30_000, HOUR_MS), ResolutionTier::Raw);
        assert_eq!(selector.select(0, 0), ResolutionTier::Raw);
    }

    #[test]
    fn never_finer_than_either_rule() {
        let selector = ResolutionSelector::default();
        for step in [0, 60_000, 150_000, 600_000, 1_800_000, 21_600_000] {
            for range in [0, HOUR_MS, 12 * HOUR_MS, 3 * DAY_MS, 7 * DAY_MS, 30 * DAY_MS] {
                let tier = selector.select(step, range);
                assert!(tier >= selector.by_step(step));
                assert!(tier >= selector.by_range(range));
            }
        }
    }
}
