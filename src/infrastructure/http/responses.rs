//! HTTP responses module
//!
//! This module contains HTTP response formatting and utilities.

use crate::{
    config::AppConfig,
    infrastructure::http::models::ApiEnvelope,
    middleware::security_headers::{add_security_headers_to_response, SecurityHeadersMiddleware},
    shared::error::AppError,
};
use serde_json::Value;
use warp::http::StatusCode;
use warp::reply::Response;

/// Response formatter for HTTP responses
pub struct ResponseFormatter;

impl ResponseFormatter {
    /// Format a successful enveloped response
    pub fn success(data: Value, config: &AppConfig) -> Response {
        let envelope = ApiEnvelope::success(data);
        let reply = warp::reply::with_status(warp::reply::json(&envelope), StatusCode::OK);
        add_security_headers_to_response(reply, &SecurityHeadersMiddleware::new(config.clone()))
    }

    /// Format an error envelope with an explicit status code
    pub fn error_with_status(
        message: String,
        details: Option<String>,
        status: StatusCode,
        config: &AppConfig,
    ) -> Response {
        let envelope = ApiEnvelope::error(message, details);
        let reply = warp::reply::with_status(warp::reply::json(&envelope), status);
        add_security_headers_to_response(reply, &SecurityHeadersMiddleware::new(config.clone()))
    }

    /// Format an application error as an enveloped response
    ///
    /// The client sees `client_message()`; the raw error text only travels
    /// in `details` when development mode is on.
    pub fn from_app_error(error: &AppError, config: &AppConfig) -> Response {
        let details = if config.security.development_mode {
            Some(error.to_string())
        } else {
            None
        };

        Self::error_with_status(
            error.client_message(),
            details,
            error.http_status_code(),
            config,
        )
    }
}

/// Map warp rejections that never reached a handler into the error envelope,
/// so malformed requests get the same response shape as handled failures.
pub async fn handle_rejection(
    rejection: warp::Rejection,
    config: AppConfig,
) -> Result<Response, std::convert::Infallible> {
    let (status, message) = if rejection.is_not_found() {
        (StatusCode::NOT_FOUND, "Not found".to_string())
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        (
            StatusCode::BAD_REQUEST,
            format!("Invalid request body: {}", err),
        )
    } else if rejection.find::<warp::reject::InvalidQuery>().is_some() {
        (
            StatusCode::BAD_REQUEST,
            "Invalid or missing query parameters".to_string(),
        )
    } else if rejection.find::<warp::reject::PayloadTooLarge>().is_some() {
        (
            StatusCode::PAYLOAD_TOO_LARGE,
            "Request body too large".to_string(),
        )
    } else if rejection
        .find::<warp::reject::MethodNotAllowed>()
        .is_some()
    {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "Method not allowed".to_string(),
        )
    } else {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        )
    };

    Ok(ResponseFormatter::error_with_status(
        message, None, status, &config,
    ))
}
