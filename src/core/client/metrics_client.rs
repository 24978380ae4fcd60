use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::query::model::QueryParams;

pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Chart labels forwarded to the backend alongside a query. Unset labels are omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryLabels {
    pub board_short_name: Option<String>,
    pub metric_short_name: Option<String>,
    /// Query-range token of the chart, e.g. `"60m"`.
    pub aligned_range: Option<String>,
}

impl QueryLabels {
    fn append_to(&self, url: &mut String) {
        let pairs = [
            ("board_short_name", &self.board_short_name),
            ("metric_short_name", &self.metric_short_name),
            ("aligned_range", &self.aligned_range),
        ];
        for (key, value) in pairs {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                url.push('&');
                url.push_str(key);
                url.push('=');
                url.push_str(&urlencoding::encode(value));
            }
        }
    }
}

/// Query client for a Prometheus/Thanos compatible query API.
#[derive(Debug, Clone)]
pub struct MetricsClient {
    client: Client,
    base_url: String,
}

impl MetricsClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/api/v1/query_range` with the resolved parameters.
    pub async fn query_range(
        &self,
        query: &str,
        params: &QueryParams,
        labels: &QueryLabels,
    ) -> Result<Value> {
        let url = build_query_range_url(&self.base_url, query, params, labels);
        debug!(step = %params.step, resolution = %params.resolution.as_token(), "query_range");
        self.get_json("query_range", &url).await
    }

    /// `GET {base}/api/v1/query` evaluated at `time` (epoch seconds).
    pub async fn query_instant(&self, query: &str, time: i64) -> Result<Value> {
        let url = build_instant_query_url(&self.base_url, query, time);
        debug!(time, "query");
        self.get_json("query", &url).await
    }

    async fn get_json(&self, endpoint: &str, url: &str) -> Result<Value> {
        let trace_id = Uuid::new_v4();
        debug!(%trace_id, endpoint, "sending metrics request");

        let resp = self
            .client
            .get(url)
            .header(TRACE_ID_HEADER, trace_id.to_string())
            .send()
            .await
            .with_context(|| format!("{endpoint} request failed (trace_id={trace_id})"))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%trace_id, %status, endpoint, "metrics backend rejected request");
            return Err(anyhow!(
                "metrics backend returned {status} (trace_id={trace_id}): {body}"
            ));
        }

        resp.json::<Value>()
            .await
            .with_context(|| format!("invalid {endpoint} response (trace_id={trace_id})"))
    }
}

/// Builds the full query_range URL; `step` and `max_source_resolution` use their
/// wire encodings (`"30000ms"`, `"5m"`).
pub fn build_query_range_url(
    base_url: &str,
    query: &str,
    params: &QueryParams,
    labels: &QueryLabels,
) -> String {
    let mut url = format!(
        "{}/api/v1/query_range?query={}&start={}&end={}&step={}&max_source_resolution={}&dedup=true&partial_response=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(query),
        params.range.start_seconds(),
        params.range.end_seconds(),
        params.step,
        params.resolution.as_token(),
    );
    labels.append_to(&mut url);
    url
}

pub fn build_instant_query_url(base_url: &str, query: &str, time: i64) -> String {
    format!(
        "{}/api/v1/query?query={}&time={}&dedup=true&partial_response=true",
        base_url.trim_end_matches('/'),
        urlencoding::encode(query),
        time,
    )
}
