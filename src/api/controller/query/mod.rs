//! Query controller: connects routes to the query-parameter services

use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use tracing::error;
use validator::Validate;

use crate::api::dto::query_params_dto::{
    DashboardQueryParamsDto, InstantQueryRequest, InstantQueryResponseDto, QueryParamsQuery,
    RangeQueryRequest, RangeQueryResponseDto, ResolvedQueryParamsDto,
};
use crate::api::dto::ApiResponse;
use crate::api::util::json::to_json;
use crate::app_state::AppState;
use crate::core::client::metrics_client::QueryLabels;
use crate::domain::dashboard::dto::dashboard_view_request::DashboardViewRequest;
use crate::domain::dashboard::model::DashboardView;
use crate::domain::dashboard::service::dashboard_query_service::resolve_view;
use crate::domain::dashboard::service::query_range::minutes_token;
use crate::domain::query::service::query_param_resolver::QueryRequest;
use crate::domain::query::service::query_template::render_query;
use crate::errors::AppError;

pub struct QueryController;

impl QueryController {
    pub async fn get_query_params(
        State(state): State<AppState>,
        Query(q): Query<QueryParamsQuery>,
    ) -> Result<Json<ApiResponse<ResolvedQueryParamsDto>>, AppError> {
        q.validate()?;
        let request = build_request(
            &q.start,
            &q.end,
            q.target_points,
            q.offset_multiplier,
            q.scrape_interval,
        );
        to_json(
            state
                .resolver
                .resolve(request)
                .map(ResolvedQueryParamsDto::from),
        )
    }

    pub async fn resolve_dashboard_view(
        State(state): State<AppState>,
        Json(payload): Json<DashboardViewRequest>,
    ) -> Result<Json<ApiResponse<DashboardQueryParamsDto>>, AppError> {
        payload.validate()?;
        let view = DashboardView::from(payload);
        to_json(
            resolve_view(&state.resolver, &view, Utc::now()).map(DashboardQueryParamsDto::from),
        )
    }

    pub async fn get_range_query(
        State(state): State<AppState>,
        Query(q): Query<RangeQueryRequest>,
    ) -> Result<Json<ApiResponse<RangeQueryResponseDto>>, AppError> {
        q.validate()?;
        let client = state
            .metrics_client
            .as_ref()
            .ok_or(AppError::BackendNotConfigured)?;

        let request = build_request(
            &q.start,
            &q.end,
            q.target_points,
            q.offset_multiplier,
            q.scrape_interval,
        );
        let params = state.resolver.resolve(request)?;
        let query = render_query(&q.query, &params, None);
        let labels = QueryLabels {
            board_short_name: q.board_short_name,
            metric_short_name: q.metric_short_name,
            aligned_range: Some(minutes_token(&params.range.as_range())),
        };

        let result = client
            .query_range(&query, &params, &labels)
            .await
            .map_err(|e| {
                error!(?e, "range query failed");
                AppError::BackendError(e.to_string())
            })?;

        Ok(Json(ApiResponse::ok(RangeQueryResponseDto {
            params: params.into(),
            query,
            result,
        })))
    }

    pub async fn get_instant_query(
        State(state): State<AppState>,
        Query(q): Query<InstantQueryRequest>,
    ) -> Result<Json<ApiResponse<InstantQueryResponseDto>>, AppError> {
        q.validate()?;
        let client = state
            .metrics_client
            .as_ref()
            .ok_or(AppError::BackendNotConfigured)?;

        let aligner = state.resolver.aligner();
        let time = match q.time.as_deref() {
            Some(raw) => aligner.align(raw)?,
            None => aligner.align(Utc::now().timestamp())?,
        };

        let result = client.query_instant(&q.query, time).await.map_err(|e| {
            error!(?e, "instant query failed");
            AppError::BackendError(e.to_string())
        })?;

        Ok(Json(ApiResponse::ok(InstantQueryResponseDto {
            query: q.query,
            time,
            result,
        })))
    }
}

fn build_request<'a>(
    start: &'a str,
    end: &'a str,
    target_points: Option<u32>,
    offset_multiplier: Option<i64>,
    scrape_interval: Option<u64>,
) -> QueryRequest<'a> {
    let mut request = QueryRequest::new(start, end).with_jitter_units(offset_multiplier.unwrap_or(0));
    request.target_points = target_points;
    request.scrape_interval_secs = scrape_interval;
    request
}
