use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::dashboard::model::{DashboardView, TimeRangeOption};

/// Payload describing the dashboard's current view.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DashboardViewRequest {
    /// Selected preset; `custom` requires `start_date` and `end_date`.
    #[serde(default)]
    pub time_range: TimeRangeOption,

    /// Epoch seconds or RFC 3339.
    #[validate(length(min = 1, max = 64))]
    pub start_date: Option<String>,

    #[validate(length(min = 1, max = 64))]
    pub end_date: Option<String>,

    #[serde(default)]
    pub is_any_chart_zoomed: bool,

    #[serde(default)]
    pub is_live_update_enabled: bool,

    #[serde(default)]
    pub is_date_picker_open: bool,

    #[validate(range(min = -1000, max = 1000))]
    pub offset_multiplier: Option<i64>,

    #[validate(range(min = 1, max = 11000))]
    pub target_points: Option<u32>,

    #[validate(range(min = 1, max = 3600))]
    pub scrape_interval: Option<u64>,
}

impl From<DashboardViewRequest> for DashboardView {
    fn from(value: DashboardViewRequest) -> Self {
        Self {
            time_range: value.time_range,
            start: value.start_date,
            end: value.end_date,
            is_zoomed: value.is_any_chart_zoomed,
            is_live_update_enabled: value.is_live_update_enabled,
            is_date_picker_open: value.is_date_picker_open,
            offset_multiplier: value.offset_multiplier.unwrap_or(0),
            target_points: value.target_points,
            scrape_interval_secs: value.scrape_interval,
        }
    }
}
