//! Route builder module
//!
//! This module contains the main route builder that orchestrates the creation
//! of all application routes.

use crate::{
    application::services::{DepositService, MetricsService, QuoteService},
    application::use_cases::{GetMetricsUseCase, HealthCheckUseCase},
    config::AppConfig,
    infrastructure::adapters::{MonitoringAdapter, PropertyApi},
    infrastructure::http::routes::{HealthRoutes, MetricsRoutes, PaymentsRoutes, QuoteRoutes},
    middleware::rate_limit::RateLimitMiddleware,
};
use std::sync::Arc;
use warp::Filter;

/// Route builder that orchestrates the creation of all application routes
pub struct RouteBuilder;

impl RouteBuilder {
    /// Build all application routes
    #[allow(clippy::too_many_arguments)]
    pub fn build_routes(
        config: AppConfig,
        quote_service: Arc<QuoteService>,
        deposit_service: Arc<DepositService>,
        metrics_use_case: Arc<GetMetricsUseCase>,
        health_use_case: Arc<HealthCheckUseCase>,
        metrics_service: Arc<MetricsService>,
        monitoring: Arc<MonitoringAdapter>,
        rate_limit_middleware: Arc<RateLimitMiddleware>,
        property_api: Option<Arc<dyn PropertyApi>>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        // Build individual route groups
        let quote_route = QuoteRoutes::create_quote_route(
            config.clone(),
            quote_service,
            metrics_service.clone(),
            monitoring.clone(),
            rate_limit_middleware.clone(),
        );

        let payments_routes = PaymentsRoutes::create_routes(
            config.clone(),
            deposit_service,
            metrics_service,
            monitoring.clone(),
            rate_limit_middleware,
        );

        let health_route =
            HealthRoutes::create_health_route(config.clone(), health_use_case, property_api);

        let metrics_route = MetricsRoutes::create_metrics_route(config.clone(), metrics_use_case);

        let prometheus_route = MetricsRoutes::create_prometheus_route(config, monitoring);

        // Combine all routes
        quote_route
            .or(payments_routes)
            .or(health_route)
            .or(metrics_route)
            .or(prometheus_route)
    }
}
