//! Payments HTTP handlers
//!
//! Deposit verification and authorization endpoints. Both re-derive the
//! deposit from upstream data inside the service; nothing here reads an
//! amount out of the request.

use std::sync::Arc;
use std::time::Instant;

use warp::Reply;

use crate::application::services::{DepositAuthorizeRequest, DepositService, MetricsService};
use crate::config::AppConfig;
use crate::infrastructure::adapters::MonitoringAdapter;
use crate::infrastructure::http::models::{DepositVerifyQuery, RequestContext};
use crate::infrastructure::http::responses::ResponseFormatter;
use crate::infrastructure::http::utils::extract_and_validate_client_ip;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::shared::error::AppError;
use crate::shared::logging::LoggingUtils;

/// Handle deposit verification requests
pub async fn handle_deposit_verify(
    query: DepositVerifyQuery,
    client_ip: String,
    service: Arc<DepositService>,
    metrics_service: Arc<MetricsService>,
    monitoring: Arc<MonitoringAdapter>,
    rate_limiter: Arc<RateLimitMiddleware>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let started = Instant::now();
    let client_ip = extract_and_validate_client_ip(&client_ip, &config);

    let context = RequestContext::new(client_ip.clone(), "payments.deposit_verify".to_string())
        .with_reservation_id(query.reservation_id.clone());
    LoggingUtils::log_request(
        &context.request_id,
        &context.operation,
        &context.client_ip,
        None,
    );

    if let Err(err) = rate_limiter.check_rate_limit(&client_ip) {
        metrics_service.record_rate_limited_request();
        monitoring.record_rate_limited_request();
        return Ok(ResponseFormatter::from_app_error(&err, &config));
    }

    let result = service
        .verify_deposit(&query.reservation_id)
        .await
        .and_then(|verified| serde_json::to_value(&verified).map_err(AppError::from));

    let duration_ms = started.elapsed().as_millis() as u64;
    metrics_service.record_request(result.is_ok());
    metrics_service.record_response_time(duration_ms);
    monitoring.record_request(duration_ms as f64);

    let response = match result {
        Ok(data) => {
            LoggingUtils::log_success(&context.request_id, &context.operation, duration_ms);
            ResponseFormatter::success(data, &config)
        }
        Err(err) => {
            // The per-reservation throttle inside the service also lands here
            if matches!(err, AppError::RateLimited { .. }) {
                metrics_service.record_rate_limited_request();
                monitoring.record_rate_limited_request();
            }
            LoggingUtils::log_error(&context.request_id, &context.operation, &err, duration_ms);
            ResponseFormatter::from_app_error(&err, &config)
        }
    };

    Ok(response)
}

/// Handle deposit authorization requests
pub async fn handle_deposit_authorize(
    body: DepositAuthorizeRequest,
    client_ip: String,
    user_agent: Option<String>,
    service: Arc<DepositService>,
    metrics_service: Arc<MetricsService>,
    monitoring: Arc<MonitoringAdapter>,
    rate_limiter: Arc<RateLimitMiddleware>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let started = Instant::now();
    let client_ip = extract_and_validate_client_ip(&client_ip, &config);

    let mut context =
        RequestContext::new(client_ip.clone(), "payments.deposit_authorize".to_string())
            .with_reservation_id(body.reservation_id.clone());
    if let Some(agent) = user_agent {
        context = context.with_user_agent(agent);
    }
    LoggingUtils::log_request(
        &context.request_id,
        &context.operation,
        &context.client_ip,
        context.user_agent.as_deref(),
    );

    if let Err(err) = rate_limiter.check_rate_limit(&client_ip) {
        metrics_service.record_rate_limited_request();
        monitoring.record_rate_limited_request();
        return Ok(ResponseFormatter::from_app_error(&err, &config));
    }

    let result = service
        .authorize_deposit(&body, Some(client_ip.clone()))
        .await
        .and_then(|authorized| serde_json::to_value(&authorized).map_err(AppError::from));

    let duration_ms = started.elapsed().as_millis() as u64;
    metrics_service.record_request(result.is_ok());
    metrics_service.record_response_time(duration_ms);
    monitoring.record_request(duration_ms as f64);

    let response = match result {
        Ok(data) => {
            LoggingUtils::log_success(&context.request_id, &context.operation, duration_ms);
            ResponseFormatter::success(data, &config)
        }
        Err(err) => {
            if matches!(err, AppError::RateLimited { .. }) {
                metrics_service.record_rate_limited_request();
                monitoring.record_rate_limited_request();
            }
            LoggingUtils::log_error(&context.request_id, &context.operation, &err, duration_ms);
            ResponseFormatter::from_app_error(&err, &config)
        }
    };

    Ok(response)
}
