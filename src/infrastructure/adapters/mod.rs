//! Infrastructure adapters module
//!
//! This module contains adapters for external services and infrastructure concerns.

pub mod attempt_store;
pub mod authorize_net;
pub mod lodgix;
pub mod monitoring;

// Re-export all adapters
pub use attempt_store::{AttemptStore, ReservationLease};
pub use authorize_net::{AuthorizeNetAdapter, CardGateway, GatewayAuthorization};
pub use lodgix::{LodgixAdapter, PropertyApi, QuoteFetch, ReservationConfirmation};
pub use monitoring::{MonitoringAdapter, MetricsSummary};
