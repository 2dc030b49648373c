//! Use cases - Application business operations

pub mod health_check;
pub mod metrics;

pub use health_check::HealthCheckUseCase;
pub use metrics::GetMetricsUseCase;
