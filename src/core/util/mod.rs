pub mod ladder;
pub mod query_duration;
