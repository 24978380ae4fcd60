pub mod dashboard_query_service;
pub mod query_range;
pub mod time_window;
