//! Domain layer - Core business logic and domain models
//!
//! This module contains the core business logic, domain models, and business rules
//! that are independent of infrastructure concerns like HTTP, databases, etc.

pub mod health;
pub mod payment;
pub mod quote;
pub mod reservation;

pub use health::{HealthResponse, HealthStatus};
pub use payment::{CardDetails, PaymentAttempt, PaymentPhase};
pub use quote::{
    reconcile, FeeItem, QuoteBreakdown, StayParams, UpstreamQuote,
    CLEANING_FEE, DEPOSIT_RATE, TAX_RATE,
};
pub use reservation::{ReservationRecord, StayDates, VerifiedDeposit};
