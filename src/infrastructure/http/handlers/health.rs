//! Health check handler module
//!
//! This module contains the health check endpoint handler for monitoring system status.

use crate::{
    application::use_cases::HealthCheckUseCase,
    config::AppConfig,
    infrastructure::adapters::PropertyApi,
    middleware::security_headers::{add_security_headers_to_response, SecurityHeadersMiddleware},
};
use std::sync::Arc;
use warp::Reply;

/// Handle health check requests
pub async fn handle_health_request(
    health_use_case: Arc<HealthCheckUseCase>,
    config: AppConfig,
    property_api: Option<Arc<dyn PropertyApi>>,
) -> Result<impl Reply, warp::reject::Rejection> {
    let health_response = health_use_case
        .execute(property_api)
        .await
        .map_err(|_| warp::reject::not_found())?;

    let status = warp::http::StatusCode::from_u16(health_response.http_status_code())
        .unwrap_or(warp::http::StatusCode::OK);

    // Apply security headers only
    let response = add_security_headers_to_response(
        warp::reply::with_status(warp::reply::json(&health_response), status),
        &SecurityHeadersMiddleware::new(config.clone()),
    );

    Ok(response)
}
