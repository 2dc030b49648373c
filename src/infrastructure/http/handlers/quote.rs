//! Quote HTTP handlers
//!
//! This module contains the stay-quote endpoint handler.

use std::sync::Arc;
use std::time::Instant;

use warp::Reply;

use crate::application::services::{MetricsService, QuoteService, QuoteStayRequest};
use crate::config::AppConfig;
use crate::infrastructure::adapters::MonitoringAdapter;
use crate::infrastructure::http::models::RequestContext;
use crate::infrastructure::http::responses::ResponseFormatter;
use crate::infrastructure::http::utils::extract_and_validate_client_ip;
use crate::middleware::rate_limit::RateLimitMiddleware;
use crate::shared::error::AppError;
use crate::shared::logging::LoggingUtils;

/// Handle stay quote requests
pub async fn handle_quote_request(
    body: QuoteStayRequest,
    client_ip: String,
    user_agent: Option<String>,
    service: Arc<QuoteService>,
    metrics_service: Arc<MetricsService>,
    monitoring: Arc<MonitoringAdapter>,
    rate_limiter: Arc<RateLimitMiddleware>,
    config: AppConfig,
) -> Result<impl Reply, warp::reject::Rejection> {
    let started = Instant::now();
    let client_ip = extract_and_validate_client_ip(&client_ip, &config);

    let mut context = RequestContext::new(client_ip.clone(), "quote.stay".to_string());
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
        .quote_stay(&body)
        .await
        .and_then(|breakdown| serde_json::to_value(&breakdown).map_err(AppError::from));

    let duration_ms = started.elapsed().as_millis() as u64;
    metrics_service.record_request(result.is_ok());
    metrics_service.record_response_time(duration_ms);
    monitoring.record_request(duration_ms as f64);

    let response = match result {
        Ok(data) => {
            metrics_service.record_quote();
            monitoring.record_quote();
            LoggingUtils::log_success(&context.request_id, &context.operation, duration_ms);
            ResponseFormatter::success(data, &config)
        }
        Err(err) => {
            LoggingUtils::log_error(&context.request_id, &context.operation, &err, duration_ms);
            ResponseFormatter::from_app_error(&err, &config)
        }
    };

    Ok(response)
}
