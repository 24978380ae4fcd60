use std::sync::Arc;

use tracing::info;

use crate::config::AppConfig;
use crate::core::client::metrics_client::MetricsClient;
use crate::domain::query::service::query_param_resolver::QueryParamResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<QueryParamResolver>,
    /// `None` when no metrics backend URL is configured; range queries then answer 503.
    pub metrics_client: Option<Arc<MetricsClient>>,
}

pub fn build_app_state(config: &AppConfig) -> AppState {
    let metrics_client = config.metrics_backend_url.as_deref().map(|url| {
        info!(backend = url, "metrics backend configured");
        Arc::new(MetricsClient::new(url))
    });

    AppState {
        resolver: Arc::new(QueryParamResolver::new(config.resolver.clone())),
        metrics_client,
    }
}
