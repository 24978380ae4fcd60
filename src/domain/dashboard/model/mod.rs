//! Dashboard view state passed explicitly into parameter resolution.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::util::query_duration::QueryDuration;
use crate::domain::query::model::QueryParams;

/// Time-range selector values of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeRangeOption {
    #[serde(rename = "live")]
    Live,
    #[serde(rename = "5m")]
    Last5Minutes,
    #[serde(rename = "15m")]
    Last15Minutes,
    #[serde(rename = "30m")]
    Last30Minutes,
    #[default]
    #[serde(rename = "1h")]
    Last1Hour,
    #[serde(rename = "3h")]
    Last3Hours,
    #[serde(rename = "6h")]
    Last6Hours,
    #[serde(rename = "12h")]
    Last12Hours,
    #[serde(rename = "24h")]
    Last24Hours,
    #[serde(rename = "2d")]
    Last2Days,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "custom")]
    Custom,
}

impl TimeRangeOption {
    pub const ALL: [TimeRangeOption; 12] = [
        TimeRangeOption::Live,
        TimeRangeOption::Last5Minutes,
        TimeRangeOption::Last15Minutes,
        TimeRangeOption::Last30Minutes,
        TimeRangeOption::Last1Hour,
        TimeRangeOption::Last3Hours,
        TimeRangeOption::Last6Hours,
        TimeRangeOption::Last12Hours,
        TimeRangeOption::Last24Hours,
        TimeRangeOption::Last2Days,
        TimeRangeOption::Last7Days,
        TimeRangeOption::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRangeOption::Live => "live",
            TimeRangeOption::Last5Minutes => "5m",
            TimeRangeOption::Last15Minutes => "15m",
            TimeRangeOption::Last30Minutes => "30m",
            TimeRangeOption::Last1Hour => "1h",
            TimeRangeOption::Last3Hours => "3h",
            TimeRangeOption::Last6Hours => "6h",
            TimeRangeOption::Last12Hours => "12h",
            TimeRangeOption::Last24Hours => "24h",
            TimeRangeOption::Last2Days => "2d",
            TimeRangeOption::Last7Days => "7d",
            TimeRangeOption::Custom => "custom",
        }
    }

    /// Length of the preset window. `Live` tails the last five minutes.
    pub fn duration(self) -> Option<QueryDuration> {
        let d = match self {
            TimeRangeOption::Live | TimeRangeOption::Last5Minutes => QueryDuration::from_mins(5),
            TimeRangeOption::Last15Minutes => QueryDuration::from_mins(15),
            TimeRangeOption::Last30Minutes => QueryDuration::from_mins(30),
            TimeRangeOption::Last1Hour => QueryDuration::from_hours(1),
            TimeRangeOption::Last3Hours => QueryDuration::from_hours(3),
            TimeRangeOption::Last6Hours => QueryDuration::from_hours(6),
            TimeRangeOption::Last12Hours => QueryDuration::from_hours(12),
            TimeRangeOption::Last24Hours => QueryDuration::from_hours(24),
            TimeRangeOption::Last2Days => QueryDuration::from_days(2),
            TimeRangeOption::Last7Days => QueryDuration::from_days(7),
            TimeRangeOption::Custom => return None,
        };
        Some(d)
    }
}

impl fmt::Display for TimeRangeOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRangeOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRangeOption::ALL
            .into_iter()
            .find(|option| option.as_str() == s.trim())
            .ok_or_else(|| format!("unknown time range '{s}'"))
    }
}

/// Everything the dashboard knows about the window a chart should show.
///
/// Replaces ambient UI context: the caller builds one of these and hands it over.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardView {
    pub time_range: TimeRangeOption,
    /// Raw bounds of a custom or zoomed window (epoch seconds or RFC 3339).
    pub start: Option<String>,
    pub end: Option<String>,
    pub is_zoomed: bool,
    pub is_live_update_enabled: bool,
    pub is_date_picker_open: bool,
    /// Per-chart jitter multiplier so sibling charts get distinct steps.
    pub offset_multiplier: i64,
    pub target_points: Option<u32>,
    pub scrape_interval_secs: Option<u64>,
}

impl DashboardView {
    pub fn uses_explicit_bounds(&self) -> bool {
        self.is_zoomed || self.time_range == TimeRangeOption::Custom
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardQueryParams {
    #[serde(flatten)]
    pub params: QueryParams,
    /// Range used inside `*_over_time` windows: the preset, or `"{minutes}m"`.
    pub query_range: String,
    pub sub_query_step: QueryDuration,
    /// Refresh cadence when the view is live tailing.
    pub live_refresh: Option<QueryDuration>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_round_trip_through_str_and_serde() {
        for option in TimeRangeOption::ALL {
            assert_eq!(option.as_str().parse::<TimeRangeOption>().unwrap(), option);
            let json = serde_json::to_string(&option).unwrap();
            assert_eq!(json, format!("\"{}\"", option.as_str()));
        }
        assert!("90m".parse::<TimeRangeOption>().is_err());
    }

    #[test]
    fn custom_has_no_preset_duration() {
        assert_eq!(TimeRangeOption::Custom.duration(), None);
        assert_eq!(TimeRangeOption::Live.duration(), Some(QueryDuration::from_mins(5)));
        assert_eq!(TimeRangeOption::Last7Days.duration(), Some(QueryDuration::from_days(7)));
    }
}
