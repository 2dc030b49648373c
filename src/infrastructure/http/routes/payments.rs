//! Payments routes
//!
//! Deposit verification and authorization route configurations.

use std::sync::Arc;
use warp::Filter;

use crate::application::services::{DepositService, MetricsService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::MonitoringAdapter;
use crate::infrastructure::http::handlers::{handle_deposit_authorize, handle_deposit_verify};
use crate::infrastructure::http::models::DepositVerifyQuery;
use crate::infrastructure::http::utils::{
    client_ip_header, with_config, with_deposit_service, with_metrics_service,
    with_monitoring_adapter, with_rate_limit_middleware,
};
use crate::middleware::rate_limit::RateLimitMiddleware;

pub struct PaymentsRoutes;

impl PaymentsRoutes {
    pub fn create_routes(
        config: AppConfig,
        service: Arc<DepositService>,
        metrics_service: Arc<MetricsService>,
        monitoring: Arc<MonitoringAdapter>,
        rate_limit_middleware: Arc<RateLimitMiddleware>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        let verify = warp::path("payments")
            .and(warp::path("deposit"))
            .and(warp::path("verify"))
            .and(warp::path::end())
            .and(warp::get())
            .and(warp::query::<DepositVerifyQuery>())
            .and(client_ip_header())
            .and(with_deposit_service(service.clone()))
            .and(with_metrics_service(metrics_service.clone()))
            .and(with_monitoring_adapter(monitoring.clone()))
            .and(with_rate_limit_middleware(rate_limit_middleware.clone()))
            .and(with_config(config.clone()))
            .and_then(handle_deposit_verify);

        let authorize = warp::path("payments")
            .and(warp::path("deposit"))
            .and(warp::path("authorize"))
            .and(warp::path::end())
            .and(warp::post())
            .and(warp::body::content_length_limit(
                config.server.max_request_size as u64,
            ))
            .and(warp::body::json())
            .and(client_ip_header())
            .and(warp::header::optional::<String>("user-agent"))
            .and(with_deposit_service(service))
            .and(with_metrics_service(metrics_service))
            .and(with_monitoring_adapter(monitoring))
            .and(with_rate_limit_middleware(rate_limit_middleware))
            .and(with_config(config))
            .and_then(handle_deposit_authorize);

        verify.or(authorize)
    }
}
