//! Rental Booking Server - Quote reconciliation and deposit payments for
//! vacation rentals
//!
//! This library fronts a property-management API with a canonical quote
//! breakdown endpoint and a deposit payment flow that re-derives every
//! charged amount from trusted upstream data.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod middleware;
pub mod shared;

#[cfg(test)]
pub mod tests;

pub use config::AppConfig;
pub use infrastructure::http::HttpServer;
pub use shared::error::{AppError, AppResult};

/// Application result type
pub type Result<T> = std::result::Result<T, AppError>;
