//! Controllers: extract request data, delegate to domain services, wrap responses.

pub mod query;
