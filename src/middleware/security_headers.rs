//! Security headers middleware
//!
//! Applies a fixed set of response headers for a JSON API deployed behind a
//! reverse proxy. The header set is intentionally strict; nothing served here
//! is meant to be embedded or cached.

use crate::config::AppConfig;
use serde::Serialize;
use warp::http::header::HeaderValue;
use warp::reply::Response;
use warp::Reply;

/// Security headers middleware
pub struct SecurityHeadersMiddleware {
    enabled: bool,
}

impl SecurityHeadersMiddleware {
    /// Create a new security headers middleware from configuration
    pub fn new(config: AppConfig) -> Self {
        Self {
            enabled: config.security.enable_security_headers,
        }
    }

    /// The header set applied to every response when enabled
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        if !self.enabled {
            return Vec::new();
        }

        vec![
            ("content-security-policy", "default-src 'none'; frame-ancestors 'none'"),
            ("x-content-type-options", "nosniff"),
            ("x-frame-options", "DENY"),
            ("referrer-policy", "no-referrer"),
            ("cache-control", "no-store"),
        ]
    }

    /// Apply the configured headers to a response
    pub fn apply(&self, mut response: Response) -> Response {
        for (name, value) in self.headers() {
            if let Ok(value) = HeaderValue::from_str(value) {
                response.headers_mut().insert(name, value);
            }
        }
        response
    }
}

/// Serialize a value as JSON and attach the configured security headers
pub fn create_json_response_with_security_headers<T: Serialize>(
    data: &T,
    middleware: &SecurityHeadersMiddleware,
) -> Response {
    middleware.apply(warp::reply::json(data).into_response())
}

/// Attach the configured security headers to an existing reply
pub fn add_security_headers_to_response(
    reply: impl Reply,
    middleware: &SecurityHeadersMiddleware,
) -> Response {
    middleware.apply(reply.into_response())
}
