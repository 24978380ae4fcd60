//! Dashboard time-window handling on top of query resolution.

pub mod dto;
pub mod model;
pub mod service;
