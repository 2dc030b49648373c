//! HTTP route handlers module
//!
//! This module contains separate route handlers for different endpoint types,
//! organized by functionality to improve maintainability and testability.

pub mod health;
pub mod metrics;
pub mod payments;
pub mod quote;

pub use health::handle_health_request;
pub use metrics::{handle_metrics_request, handle_prometheus_request};
pub use payments::{handle_deposit_authorize, handle_deposit_verify};
pub use quote::handle_quote_request;
