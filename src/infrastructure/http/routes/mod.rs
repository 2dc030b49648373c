//! HTTP routes module
//!
//! This module contains all HTTP route configurations and handlers.

pub mod builder;
pub mod health;
pub mod metrics;
pub mod payments;
pub mod quote;

// Re-export commonly used types
pub use builder::RouteBuilder;
pub use health::HealthRoutes;
pub use metrics::MetricsRoutes;
pub use payments::PaymentsRoutes;
pub use quote::QuoteRoutes;
