use crate::domain::query::model::QueryParams;

pub const RATE_INTERVAL_VAR: &str = "$__rate_interval";
pub const RANGE_VAR: &str = "$__range";
pub const STEP_VAR: &str = "$__step";

/// Substitutes resolved windows into a PromQL template.
///
/// `range_token` is the effective query range (`"1h"`, `"90m"`); when `None`, the
/// aligned range length is used.
pub fn render_query(template: &str, params: &QueryParams, range_token: Option<&str>) -> String {
    let range = match range_token {
        Some(token) => token.to_string(),
        None => params.range.duration().to_compact_token(),
    };

    template
        .replace(RATE_INTERVAL_VAR, &params.rate_interval.to_string())
        .replace(RANGE_VAR, &range)
        .replace(STEP_VAR, &params.step.to_string())
}
