//! Infrastructure layer - External concerns and adapters
//!
//! This module contains infrastructure concerns including external services,
//! adapters, and HTTP handling.

pub mod adapters;
pub mod http;

// Re-export main adapters
pub use adapters::{AuthorizeNetAdapter, LodgixAdapter, MonitoringAdapter};
