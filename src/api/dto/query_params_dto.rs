//! Query-parameter API DTOs

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};
use validator::Validate;

use crate::core::util::query_duration::QueryDuration;
use crate::domain::dashboard::model::DashboardQueryParams;
use crate::domain::query::model::{QueryParams, RateInterval, ResolutionTier, StepDuration};

/// `GET /api/v1/query/params`
#[derive(Deserialize, Debug, Default, Validate)]
pub struct QueryParamsQuery {
    /// Epoch seconds (integer or fractional) or RFC 3339.
    #[validate(length(min = 1, max = 64))]
    pub start: String,
    #[validate(length(min = 1, max = 64))]
    pub end: String,
    #[validate(range(min = 1, max = 11000))]
    pub target_points: Option<u32>,
    #[validate(range(min = -1000, max = 1000))]
    pub offset_multiplier: Option<i64>,
    /// Scrape interval in seconds.
    #[validate(range(min = 1, max = 3600))]
    pub scrape_interval: Option<u64>,
}

/// `GET /api/v1/query/range`
#[derive(Deserialize, Debug, Default, Validate)]
pub struct RangeQueryRequest {
    /// PromQL template; may reference `$__rate_interval`, `$__range` and `$__step`.
    #[validate(length(min = 1, max = 8192))]
    pub query: String,
    #[validate(length(min = 1, max = 64))]
    pub start: String,
    #[validate(length(min = 1, max = 64))]
    pub end: String,
    #[validate(range(min = 1, max = 11000))]
    pub target_points: Option<u32>,
    #[validate(range(min = -1000, max = 1000))]
    pub offset_multiplier: Option<i64>,
    #[validate(range(min = 1, max = 3600))]
    pub scrape_interval: Option<u64>,
    #[validate(length(max = 128))]
    pub board_short_name: Option<String>,
    #[validate(length(max = 128))]
    pub metric_short_name: Option<String>,
}

/// `GET /api/v1/query/instant`
#[derive(Deserialize, Debug, Default, Validate)]
pub struct InstantQueryRequest {
    #[validate(length(min = 1, max = 8192))]
    pub query: String,
    /// Evaluation time; defaults to now.
    #[validate(length(min = 1, max = 64))]
    pub time: Option<String>,
}

#[serde_as]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ResolvedQueryParamsDto {
    pub start: i64,
    pub end: i64,
    /// Effective step, e.g. `"30500ms"`.
    #[serde_as(as = "DisplayFromStr")]
    pub step: StepDuration,
    /// Ladder rung the step was derived from, e.g. `"30s"`.
    #[serde_as(as = "DisplayFromStr")]
    pub base_step: QueryDuration,
    pub resolution: ResolutionTier,
    #[serde_as(as = "DisplayFromStr")]
    pub max_source_resolution: QueryDuration,
    #[serde_as(as = "DisplayFromStr")]
    pub rate_interval: RateInterval,
}

impl From<QueryParams> for ResolvedQueryParamsDto {
    fn from(params: QueryParams) -> Self {
        Self {
            start: params.range.start_seconds(),
            end: params.range.end_seconds(),
            step: params.step,
            base_step: params.step.base(),
            resolution: params.resolution,
            max_source_resolution: params.resolution.max_source_resolution(),
            rate_interval: params.rate_interval,
        }
    }
}

#[serde_as]
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct DashboardQueryParamsDto {
    #[serde(flatten)]
    pub params: ResolvedQueryParamsDto,
    pub query_range: String,
    #[serde_as(as = "DisplayFromStr")]
    pub sub_query_step: QueryDuration,
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub live_refresh: Option<QueryDuration>,
}

impl From<DashboardQueryParams> for DashboardQueryParamsDto {
    fn from(value: DashboardQueryParams) -> Self {
        Self {
            params: value.params.into(),
            query_range: value.query_range,
            sub_query_step: value.sub_query_step,
            live_refresh: value.live_refresh,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct RangeQueryResponseDto {
    pub params: ResolvedQueryParamsDto,
    /// Query text after template substitution.
    pub query: String,
    pub result: serde_json::Value,
}

#[derive(Serialize, Debug)]
pub struct InstantQueryResponseDto {
    pub query: String,
    /// Aligned evaluation time in epoch seconds.
    pub time: i64,
    pub result: serde_json::Value,
}
