//! Pure calculators and the pipeline composing them.

pub mod query_param_resolver;
pub mod query_template;
pub mod rate_interval_calculator;
pub mod resolution_selector;
pub mod step_calculator;
pub mod timestamp_aligner;
