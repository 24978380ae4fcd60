use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::dashboard::model::{DashboardQueryParams, DashboardView};
use crate::domain::dashboard::service::query_range::{query_range_token, sub_query_step};
use crate::domain::dashboard::service::time_window::{
    collapsed_point_window, is_live_refresh_active, live_window, preset_window,
    LIVE_REFRESH_INTERVAL,
};
use crate::domain::query::model::TimeRange;
use crate::domain::query::service::query_param_resolver::QueryParamResolver;
use crate::errors::ResolveError;

/// Resolves the parameters a chart of `view` should query with at instant `now`.
///
/// Window precedence: explicit bounds (custom or zoomed), then the live-tailing
/// window, then the preset. Explicit bounds that collapse to one instant become the
/// hour ending 30m after it, capped at `now`.
pub fn resolve_view(
    resolver: &QueryParamResolver,
    view: &DashboardView,
    now: DateTime<Utc>,
) -> Result<DashboardQueryParams, ResolveError> {
    let live = is_live_refresh_active(view);

    let params = if view.uses_explicit_bounds() {
        let (Some(start), Some(end)) = (view.start.as_deref(), view.end.as_deref()) else {
            return Err(ResolveError::MissingRange);
        };
        let aligned = resolver.aligner().align_range(start, end)?;
        let window = if aligned.as_range().is_empty() {
            collapsed_point_window(aligned.start_seconds(), now)
        } else {
            aligned.as_range()
        };
        resolver.resolve_range(
            window,
            view.target_points,
            view.offset_multiplier,
            view.scrape_interval_secs,
        )
    } else {
        let window = if live {
            live_window(view.time_range, now)
        } else {
            preset_window(view.time_range, now)
        };
        let window = window.ok_or(ResolveError::MissingRange)?;
        resolver.resolve_range(
            window,
            view.target_points,
            view.offset_multiplier,
            view.scrape_interval_secs,
        )
    };

    let range: TimeRange = params.range.as_range();
    let query_range = query_range_token(view, &range);
    let sub_query_step = sub_query_step(view, &range);

    debug!(
        time_range = %view.time_range,
        zoomed = view.is_zoomed,
        live,
        query_range = %query_range,
        "resolved dashboard view"
    );

    Ok(DashboardQueryParams {
        params,
        query_range,
        sub_query_step,
        live_refresh: live.then_some(LIVE_REFRESH_INTERVAL),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::util::query_duration::QueryDuration;
    use crate::domain::dashboard::model::TimeRangeOption;
    use crate::domain::query::model::ResolutionTier;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.timestamp_opt(1_704_070_829, 0).unwrap()
    }

    #[test]
    fn preset_view_resolves_against_now() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView::default();

        let resolved = resolve_view(&resolver, &view, now()).unwrap();
        assert_eq!(resolved.params.range.end_seconds(), 1_704_070_829);
        assert_eq!(resolved.params.range.start_seconds(), 1_704_067_229);
        assert_eq!(resolved.params.step.to_string(), "30000ms");
        assert_eq!(resolved.query_range, "1h");
        assert_eq!(resolved.sub_query_step, QueryDuration::from_mins(1));
        assert_eq!(resolved.live_refresh, None);
    }

    #[test]
    fn live_view_snaps_and_reports_refresh() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            time_range: TimeRangeOption::Last15Minutes,
            is_live_update_enabled: true,
            ..DashboardView::default()
        };

        let resolved = resolve_view(&resolver, &view, now()).unwrap();
        assert_eq!(resolved.params.range.end_seconds(), 1_704_070_800);
        assert_eq!(resolved.params.range.start_seconds(), 1_704_069_900);
        assert_eq!(resolved.live_refresh, Some(LIVE_REFRESH_INTERVAL));
        assert_eq!(resolved.query_range, "15m");
    }

    #[test]
    fn zoomed_view_uses_explicit_bounds_and_offset() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            time_range: TimeRangeOption::Last7Days,
            start: Some("1704067200".into()),
            end: Some("2024-01-01T01:00:00Z".into()),
            is_zoomed: true,
            is_live_update_enabled: true,
            offset_multiplier: 5,
            ..DashboardView::default()
        };

        let resolved = resolve_view(&resolver, &view, now()).unwrap();
        assert_eq!(resolved.params.step.to_string(), "30500ms");
        assert_eq!(resolved.params.resolution, ResolutionTier::Raw);
        assert_eq!(resolved.params.rate_interval.to_string(), "1m");
        assert_eq!(resolved.query_range, "60m");
        assert_eq!(resolved.live_refresh, None);
    }

    #[test]
    fn collapsed_custom_selection_becomes_an_hour() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            time_range: TimeRangeOption::Custom,
            start: Some("1704060000".into()),
            end: Some("1704060000".into()),
            ..DashboardView::default()
        };

        let resolved = resolve_view(&resolver, &view, now()).unwrap();
        assert_eq!(resolved.params.range.start_seconds(), 1_704_058_200);
        assert_eq!(resolved.params.range.end_seconds(), 1_704_061_800);
        assert_eq!(resolved.query_range, "60m");
    }

    #[test]
    fn collapsed_selection_near_now_is_capped() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            start: Some("1704070000".into()),
            end: Some("1704070000".into()),
            is_zoomed: true,
            ..DashboardView::default()
        };

        let resolved = resolve_view(&resolver, &view, now()).unwrap();
        assert_eq!(resolved.params.range.end_seconds(), 1_704_070_829);
        assert_eq!(resolved.params.range.start_seconds(), 1_704_067_229);
    }

    #[test]
    fn custom_view_without_bounds_is_missing_range() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            time_range: TimeRangeOption::Custom,
            start: Some("1704067200".into()),
            ..DashboardView::default()
        };
        assert_eq!(
            resolve_view(&resolver, &view, now()).unwrap_err(),
            ResolveError::MissingRange
        );
    }

    #[test]
    fn custom_view_with_bad_bounds_is_invalid() {
        let resolver = QueryParamResolver::default();
        let view = DashboardView {
            time_range: TimeRangeOption::Custom,
            start: Some("soon".into()),
            end: Some("1704067200".into()),
            ..DashboardView::default()
        };
        assert!(matches!(
            resolve_view(&resolver, &view, now()),
            Err(ResolveError::InvalidTimestamp(_))
        ));
    }
}
