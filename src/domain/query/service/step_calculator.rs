use crate::config::ResolverConfig;
use crate::core::util::ladder::Ladder;
use crate::core::util::query_duration::QueryDuration;
use crate::domain::query::model::{AlignedTimeRange, StepDuration};

pub const DEFAULT_TARGET_POINTS: u32 = 150;

/// Picks a ladder-quantized step so a range returns at most `target_points` samples.
///
/// Jitter shifts the step by whole `jitter_unit` increments so that concurrent
/// dashboards asking for the same window hit distinct cache keys. The shift is
/// clamped to `max_jitter_percent` of the snapped step.
#[derive(Debug, Clone)]
pub struct StepCalculator {
    ladder: Ladder,
    jitter_unit: QueryDuration,
    max_jitter_percent: u64,
}

impl Default for StepCalculator {
    fn default() -> Self {
        Self::from_config(&ResolverConfig::default())
    }
}

impl StepCalculator {
    pub fn new(ladder: Ladder, jitter_unit: QueryDuration, max_jitter_percent: u64) -> Self {
        Self {
            ladder,
            jitter_unit,
            max_jitter_percent: max_jitter_percent.min(100),
        }
    }

    pub fn from_config(config: &ResolverConfig) -> Self {
        Self::new(
            config.step_ladder.clone(),
            config.jitter_unit,
            config.max_jitter_percent,
        )
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    pub fn compute_step(
        &self,
        aligned_start: i64,
        aligned_end: i64,
        target_points: u32,
        jitter_units: i64,
    ) -> StepDuration {
        // negative spans count as empty
        let duration_ms = aligned_end
            .saturating_sub(aligned_start)
            .max(0)
            .unsigned_abs()
            .saturating_mul(1_000);
        self.step_for_duration(duration_ms, target_points, jitter_units)
    }

    pub fn compute_step_for_range(
        &self,
        range: &AlignedTimeRange,
        target_points: u32,
        jitter_units: i64,
    ) -> StepDuration {
        self.step_for_duration(range.duration().as_millis(), target_points, jitter_units)
    }

    pub fn step_for_duration(
        &self,
        duration_ms: u64,
        target_points: u32,
        jitter_units: i64,
    ) -> StepDuration {
        let raw_ms = duration_ms.div_ceil(u64::from(target_points.max(1)));
        let base = self.ladder.snap_up(raw_ms);

        let effective = if jitter_units == 0 {
            base
        } else {
            let bound = i128::from(base.as_millis().saturating_mul(self.max_jitter_percent) / 100);
            let jitter = (i128::from(jitter_units) * i128::from(self.jitter_unit.as_millis()))
                .clamp(-bound, bound);
            let shifted = i128::from(base.as_millis()) + jitter;
            QueryDuration::from_millis(u64::try_from(shifted.max(0)).unwrap_or(u64::MAX))
        };

        StepDuration::new(base, effective)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: i64 = 1_704_067_200;
    const HOUR: i64 = 3_600;

    #[test]
    fn one_hour_uses_smallest_rung() {
        let calc = StepCalculator::default();
        let step = calc.compute_step(START, START + HOUR, DEFAULT_TARGET_POINTS, 0);
        assert_eq!(step.to_string(), "30000ms");
    }

    #[test]
    fn one_day_snaps_up_to_ten_minutes() {
        let calc = StepCalculator::default();
        let step = calc.compute_step(START, START + 24 * HOUR, DEFAULT_TARGET_POINTS, 0);
        assert_eq!(step.to_string(), "600000ms");
    }

    #[test]
    fn offset_multiplier_shifts_the_step() {
        let calc = StepCalculator::default();
        let step = calc.compute_step(START, START + HOUR, DEFAULT_TARGET_POINTS, 5);
        assert_eq!(step.to_string(), "30500ms");
        assert_eq!(step.base(), QueryDuration::from_secs(30));
    }

    #[test]
    fn jitter_is_clamped_to_twenty_percent() {
        let calc = StepCalculator::default();
        let up = calc.compute_step(START, START + HOUR, DEFAULT_TARGET_POINTS, 1_000);
        assert_eq!(up.effective(), QueryDuration::from_secs(36));
        let down = calc.compute_step(START, START + HOUR, DEFAULT_TARGET_POINTS, -1_000);
        assert_eq!(down.effective(), QueryDuration::from_secs(24));
        let extreme = calc.compute_step(START, START + HOUR, DEFAULT_TARGET_POINTS, i64::MIN);
        assert_eq!(extreme.effective(), QueryDuration::from_secs(24));
    }

    #[test]
    fn jitter_never_leaves_the_bound() {
        let calc = StepCalculator::default();
        for hours in [0, 1, 6, 24, 24 * 7, 24 * 90] {
            for jitter in [-500, -7, -1, 1, 3, 50, 10_000] {
                let plain = calc.compute_step(START, START + hours * HOUR, 150, 0);
                let shifted = calc.compute_step(START, START + hours * HOUR, 150, jitter);
                let diff = plain.as_millis().abs_diff(shifted.as_millis());
                assert!(diff * 5 <= plain.as_millis(), "{hours}h jitter {jitter}");
                assert_eq!(plain.base(), shifted.base());
            }
        }
    }

    #[test]
    fn empty_and_negative_durations_use_smallest_rung() {
        let calc = StepCalculator::default();
        assert_eq!(calc.compute_step(START, START, 150, 0).as_millis(), 30_000);
        assert_eq!(calc.compute_step(START + HOUR, START, 150, 0).as_millis(), 30_000);
        assert_eq!(calc.compute_step(START, START + HOUR, 0, 0).as_millis(), 3_600_000);
    }

    #[test]
    fn huge_ranges_fall_back_to_largest_rung() {
        let calc = StepCalculator::default();
        let step = calc.compute_step(0, 365 * 24 * HOUR, 150, 0);
        assert_eq!(step.effective(), QueryDuration::from_hours(6));
        let step = calc.compute_step(i64::MIN, i64::MAX, 150, 0);
        assert_eq!(step.effective(), QueryDuration::from_hours(6));
    }

    #[test]
    fn steps_are_ladder_members_and_monotonic() {
        let calc = StepCalculator::default();
        let mut previous = 0;
        for minutes in (0..=60 * 24 * 60).step_by(37) {
            let step = calc.step_for_duration(minutes * 60_000, 150, 0);
            assert!(calc.ladder().contains(step.effective()));
            assert!(step.as_millis() >= previous);
            previous = step.as_millis();
        }
    }
}
