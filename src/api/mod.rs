//! HTTP surface: routes → controllers → domain services.

pub mod controller;
pub mod dto;
pub mod routes;
pub mod util;
