//! HTTP route handlers.

pub mod metrics;
pub mod ping;
pub mod recipes;
