//! Derives PromQL range-query parameters (aligned window, step, downsampling
//! resolution, rate window) from a dashboard time selection, and serves them over HTTP.

pub mod api;
pub mod app_state;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod routes;
