// Time-series backend clients
pub mod metrics_client;
