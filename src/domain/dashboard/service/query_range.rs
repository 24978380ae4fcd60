use crate::core::util::query_duration::QueryDuration;
use crate::domain::dashboard::model::{DashboardView, TimeRangeOption};
use crate::domain::query::model::TimeRange;

/// Zoomed windows longer than this sub-sample every 5m instead of every 1m.
pub const COARSE_SUB_QUERY_AFTER: QueryDuration = QueryDuration::from_days(3);

/// Range token for `*_over_time(...[range])` windows.
///
/// Presets use their own label; custom and zoomed views use whole minutes of the
/// actual window, never less than one.
pub fn query_range_token(view: &DashboardView, range: &TimeRange) -> String {
    if view.uses_explicit_bounds() {
        return minutes_token(range);
    }
    match view.time_range {
        TimeRangeOption::Live => TimeRangeOption::Last5Minutes.as_str().to_string(),
        option => option.as_str().to_string(),
    }
}

/// Whole minutes of `range`, never below `"1m"`.
pub fn minutes_token(range: &TimeRange) -> String {
    let minutes = (range.duration_seconds() / 60).max(1);
    format!("{minutes}m")
}

pub fn sub_query_step(view: &DashboardView, range: &TimeRange) -> QueryDuration {
    if view.is_zoomed && range.duration() > COARSE_SUB_QUERY_AFTER {
        QueryDuration::from_mins(5)
    } else {
        QueryDuration::from_mins(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_views_use_the_preset_label() {
        let view = DashboardView {
            time_range: TimeRangeOption::Last24Hours,
            ..DashboardView::default()
        };
        let range = TimeRange::new(0, 86_400);
        assert_eq!(query_range_token(&view, &range), "24h");

        let live = DashboardView {
            time_range: TimeRangeOption::Live,
            ..DashboardView::default()
        };
        assert_eq!(query_range_token(&live, &TimeRange::new(0, 300)), "5m");
    }

    #[test]
    fn zoomed_and_custom_views_use_minutes() {
        let zoomed = DashboardView {
            time_range: TimeRangeOption::Last24Hours,
            is_zoomed: true,
            ..DashboardView::default()
        };
        assert_eq!(query_range_token(&zoomed, &TimeRange::new(0, 5_459)), "90m");
        assert_eq!(query_range_token(&zoomed, &TimeRange::new(0, 20)), "1m");

        let custom = DashboardView {
            time_range: TimeRangeOption::Custom,
            ..DashboardView::default()
        };
        assert_eq!(query_range_token(&custom, &TimeRange::new(0, 7_200)), "120m");
    }

    #[test]
    fn long_zooms_sub_sample_coarser() {
        let mut view = DashboardView {
            is_zoomed: true,
            ..DashboardView::default()
        };
        let three_days = TimeRange::new(0, 3 * 86_400);
        let four_days = TimeRange::new(0, 4 * 86_400);
        assert_eq!(sub_query_step(&view, &three_days), QueryDuration::from_mins(1));
        assert_eq!(sub_query_step(&view, &four_days), QueryDuration::from_mins(5));

        view.is_zoomed = false;
        assert_eq!(sub_query_step(&view, &four_days), QueryDuration::from_mins(1));
    }
}
