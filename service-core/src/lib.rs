//! service-core: shared infrastructure for the gateway companion services.

pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
