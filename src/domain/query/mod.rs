//! Query-parameter resolution for time-series range queries.

pub mod model;
pub mod service;
