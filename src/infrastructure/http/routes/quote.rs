//! Quote routes module
//!
//! This module contains the stay-quote route configuration.

use crate::{
    application::services::{MetricsService, QuoteService},
    config::AppConfig,
    infrastructure::adapters::MonitoringAdapter,
    infrastructure::http::{
        handlers::handle_quote_request,
        utils::{
            client_ip_header, with_config, with_metrics_service, with_monitoring_adapter,
            with_quote_service, with_rate_limit_middleware,
        },
    },
    middleware::rate_limit::RateLimitMiddleware,
};
use std::sync::Arc;
use warp::Filter;

/// Quote routes configuration
pub struct QuoteRoutes;

impl QuoteRoutes {
    /// Create the stay quote endpoint route
    pub fn create_quote_route(
        config: AppConfig,
        quote_service: Arc<QuoteService>,
        metrics_service: Arc<MetricsService>,
        monitoring: Arc<MonitoringAdapter>,
        rate_limit_middleware: Arc<RateLimitMiddleware>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path("quote")
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(
                config.server.max_request_size as u64,
            ))
            .and(warp::body::json())
            .and(client_ip_header())
            .and(warp::header::optional::<String>("user-agent"))
            .and(with_quote_service(quote_service))
            .and(with_metrics_service(metrics_service))
            .and(with_monitoring_adapter(monitoring))
            .and(with_rate_limit_middleware(rate_limit_middleware))
            .and(with_config(config))
            .and_then(handle_quote_request)
    }
}
