//! HTTP utilities - Common helper functions
//!
//! This module contains utility functions used across the HTTP infrastructure
//! for IP validation, route injection, and other common operations.

use crate::application::services::{DepositService, MetricsService, QuoteService};
use crate::application::use_cases::{GetMetricsUseCase, HealthCheckUseCase};
use crate::config::AppConfig;
use crate::infrastructure::adapters::{MonitoringAdapter, PropertyApi};
use crate::middleware::rate_limit::RateLimitMiddleware;
use std::sync::Arc;
use warp::Filter;

/// Extract and validate client IP from various sources
pub fn extract_and_validate_client_ip(raw_ip: &str, config: &AppConfig) -> String {
    // If the IP is empty or invalid, return a default
    if raw_ip.is_empty() || raw_ip == "unknown" {
        return "127.0.0.1".to_string();
    }

    // Parse the IP to validate it
    if let Ok(ip) = raw_ip.parse::<std::net::IpAddr>() {
        // Check if it's a private/local IP and if we should trust it
        if config
            .security
            .trusted_proxy_headers
            .contains(&"X-Forwarded-For".to_string())
        {
            // If we trust proxy headers, return the IP as-is
            return ip.to_string();
        } else {
            // If we don't trust proxy headers, only accept local IPs
            if ip.is_loopback() {
                return ip.to_string();
            } else {
                return "127.0.0.1".to_string();
            }
        }
    }

    // If parsing failed, return default
    "127.0.0.1".to_string()
}

/// Client address as reported by the front proxy. A missing header becomes
/// an empty string, which IP validation maps to loopback.
pub fn client_ip_header(
) -> impl Filter<Extract = (String,), Error = warp::Rejection> + Clone {
    warp::header::optional::<String>("x-forwarded-for")
        .map(|ip: Option<String>| ip.unwrap_or_default())
}

/// Helper function to inject the quote service into route
pub fn with_quote_service(
    quote_service: Arc<QuoteService>,
) -> impl Filter<Extract = (Arc<QuoteService>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || quote_service.clone())
}

/// Helper function to inject the deposit service into route
pub fn with_deposit_service(
    deposit_service: Arc<DepositService>,
) -> impl Filter<Extract = (Arc<DepositService>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || deposit_service.clone())
}

/// Helper function to inject health use case into route
pub fn with_health_use_case(
    health_use_case: Arc<HealthCheckUseCase>,
) -> impl Filter<Extract = (Arc<HealthCheckUseCase>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || health_use_case.clone())
}

/// Helper function to inject metrics use case into route
pub fn with_metrics_use_case(
    metrics_use_case: Arc<GetMetricsUseCase>,
) -> impl Filter<Extract = (Arc<GetMetricsUseCase>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || metrics_use_case.clone())
}

/// Helper function to inject the metrics service into route
pub fn with_metrics_service(
    metrics_service: Arc<MetricsService>,
) -> impl Filter<Extract = (Arc<MetricsService>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || metrics_service.clone())
}

/// Helper function to inject the Prometheus adapter into route
///
/// The adapter is shared so every route reports into the same registry.
pub fn with_monitoring_adapter(
    monitoring: Arc<MonitoringAdapter>,
) -> impl Filter<Extract = (Arc<MonitoringAdapter>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || monitoring.clone())
}

/// Helper function to inject the upstream property API into route
pub fn with_property_api(
    property_api: Option<Arc<dyn PropertyApi>>,
) -> impl Filter<Extract = (Option<Arc<dyn PropertyApi>>,), Error = std::convert::Infallible> + Clone
{
    warp::any().map(move || property_api.clone())
}

/// Helper function to inject configuration into route
pub fn with_config(
    config: AppConfig,
) -> impl Filter<Extract = (AppConfig,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || config.clone())
}

/// Helper function to inject rate limiting middleware into route
pub fn with_rate_limit_middleware(
    rate_limit_middleware: Arc<RateLimitMiddleware>,
) -> impl Filter<Extract = (Arc<RateLimitMiddleware>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || rate_limit_middleware.clone())
}
