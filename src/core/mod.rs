//! Infrastructure: backend clients and shared value utilities.

pub mod client;
pub mod util;
