//! Application services - Orchestration of domain logic

pub mod deposit_service;
pub mod metrics_service;
pub mod quote_service;

pub use deposit_service::{DepositAuthorizeRequest, DepositAuthorizeResponse, DepositService};
pub use metrics_service::MetricsService;
pub use quote_service::{QuoteService, QuoteStayRequest};
