use chrono::{DateTime, Utc};

use crate::core::util::query_duration::QueryDuration;
use crate::domain::dashboard::model::{DashboardView, TimeRangeOption};
use crate::domain::query::model::TimeRange;

/// Live-tailing views move their window forward this often.
pub const LIVE_REFRESH_INTERVAL: QueryDuration = QueryDuration::from_secs(30);

/// `[now - preset, now]`. Custom ranges have no preset window.
pub fn preset_window(option: TimeRangeOption, now: DateTime<Utc>) -> Option<TimeRange> {
    let duration = option.duration()?;
    let end = now.timestamp();
    let span = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);
    Some(TimeRange::new(end.saturating_sub(span), end))
}

/// Grid that live windows snap to, tied to the 15s scrape interval.
///
/// Only the 5m, 15m and 30m presets tail live; `Live` is served as a plain 5m preset.
pub fn live_refresh_step(option: TimeRangeOption) -> Option<QueryDuration> {
    match option {
        TimeRangeOption::Last5Minutes => Some(QueryDuration::from_secs(15)),
        TimeRangeOption::Last15Minutes => Some(QueryDuration::from_secs(30)),
        TimeRangeOption::Last30Minutes => Some(QueryDuration::from_secs(60)),
        _ => None,
    }
}

/// Live refresh pauses while zoomed or while the date picker is open.
pub fn is_live_refresh_active(view: &DashboardView) -> bool {
    live_refresh_step(view.time_range).is_some()
        && view.is_live_update_enabled
        && !view.is_zoomed
        && !view.is_date_picker_open
}

/// Preset window with both bounds floored to the live step.
pub fn live_window(option: TimeRangeOption, now: DateTime<Utc>) -> Option<TimeRange> {
    let step = i64::try_from(live_refresh_step(option)?.as_secs()).ok()?;
    let span = i64::try_from(option.duration()?.as_secs()).ok()?;

    let end = now.timestamp().div_euclid(step).checked_mul(step)?;
    let start = end.saturating_sub(span).div_euclid(step).checked_mul(step)?;
    Some(TimeRange::new(start, end))
}

/// How far past a collapsed point the window reaches before the `now` cap.
pub const COLLAPSED_POINT_LEAD: QueryDuration = QueryDuration::from_mins(30);
/// Width of the window that replaces a collapsed point.
pub const COLLAPSED_POINT_SPAN: QueryDuration = QueryDuration::from_hours(1);

/// Window used when a custom or zoomed selection has `start == end`:
/// `end = min(point + 30m, now)`, `start = end - 1h`.
pub fn collapsed_point_window(point_secs: i64, now: DateTime<Utc>) -> TimeRange {
    let lead = i64::try_from(COLLAPSED_POINT_LEAD.as_secs()).unwrap_or(i64::MAX);
    let span = i64::try_from(COLLAPSED_POINT_SPAN.as_secs()).unwrap_or(i64::MAX);
    let end = point_secs.saturating_add(lead).min(now.timestamp());
    TimeRange::new(end.saturating_sub(span), end)
}

/// Converts a chart selection in epoch milliseconds to a window in whole seconds.
///
/// Selections made right-to-left are flipped; a zero-width selection is no zoom.
pub fn zoom_window(left_ms: i64, right_ms: i64) -> Option<TimeRange> {
    if left_ms == right_ms {
        return None;
    }
    let (lo, hi) = if left_ms > right_ms {
        (right_ms, left_ms)
    } else {
        (left_ms, right_ms)
    };
    Some(TimeRange::new(lo.div_euclid(1_000), hi.div_euclid(1_000)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn preset_window_ends_now() {
        let now = at(1_704_070_800);
        let range = preset_window(TimeRangeOption::Last1Hour, now).unwrap();
        assert_eq!(range, TimeRange::new(1_704_067_200, 1_704_070_800));

        let range = preset_window(TimeRangeOption::Live, now).unwrap();
        assert_eq!(range.duration_seconds(), 300);

        assert_eq!(preset_window(TimeRangeOption::Custom, now), None);
    }

    #[test]
    fn live_window_snaps_to_step() {
        let now = at(1_704_070_829);
        let range = live_window(TimeRangeOption::Last15Minutes, now).unwrap();
        assert_eq!(range.end_seconds, 1_704_070_800);
        assert_eq!(range.start_seconds, 1_704_069_900);

        let range = live_window(TimeRangeOption::Last5Minutes, now).unwrap();
        assert_eq!(range.end_seconds, 1_704_070_815);
        assert_eq!(range.duration_seconds(), 300);

        assert_eq!(live_window(TimeRangeOption::Last1Hour, now), None);
    }

    #[test]
    fn live_option_does_not_tail() {
        assert_eq!(live_refresh_step(TimeRangeOption::Live), None);
        assert_eq!(live_window(TimeRangeOption::Live, at(1_704_070_829)), None);

        let view = DashboardView {
            time_range: TimeRangeOption::Live,
            is_live_update_enabled: true,
            ..DashboardView::default()
        };
        assert!(!is_live_refresh_active(&view));
    }

    #[test]
    fn collapsed_point_window_in_the_past() {
        let now = at(1_704_153_600);
        let range = collapsed_point_window(1_704_067_200, now);
        assert_eq!(range.end_seconds, 1_704_069_000);
        assert_eq!(range.start_seconds, 1_704_065_400);
    }

    #[test]
    fn collapsed_point_window_is_capped_at_now() {
        let now = at(1_704_067_800);
        let range = collapsed_point_window(1_704_067_200, now);
        assert_eq!(range.end_seconds, 1_704_067_800);
        assert_eq!(range.start_seconds, 1_704_064_200);
    }

    #[test]
    fn live_refresh_pauses() {
        let mut view = DashboardView {
            time_range: TimeRangeOption::Last5Minutes,
            is_live_update_enabled: true,
            ..DashboardView::default()
        };
        assert!(is_live_refresh_active(&view));

        view.is_date_picker_open = true;
        assert!(!is_live_refresh_active(&view));

        view.is_date_picker_open = false;
        view.is_zoomed = true;
        assert!(!is_live_refresh_active(&view));

        view.is_zoomed = false;
        view.time_range = TimeRangeOption::Last6Hours;
        assert!(!is_live_refresh_active(&view));
    }

    #[test]
    fn zoom_window_orders_and_truncates() {
        assert_eq!(
            zoom_window(1_704_070_800_999, 1_704_067_200_500),
            Some(TimeRange::new(1_704_067_200, 1_704_070_800))
        );
        assert_eq!(zoom_window(1_000, 1_000), None);
    }
}
