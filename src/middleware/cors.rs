//! CORS configuration for reverse proxy deployment
//!
//! The booking API is deployed behind a reverse proxy (nginx, Caddy, etc.)
//! that owns the CORS headers. This module only validates the configured
//! origins, methods, and headers at startup so a typo fails fast instead of
//! silently producing a proxy configuration that blocks the booking UI.

use crate::config::AppConfig;
use tracing::info;

/// CORS configuration for reverse proxy deployment
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
}

impl CorsConfig {
    /// Load CORS configuration from app config
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            origins: config.security.cors_origins.clone(),
            methods: config.security.cors_methods.clone(),
            headers: config.security.cors_headers.clone(),
        }
    }
}

/// CORS middleware for reverse proxy deployment
pub struct CorsMiddleware {
    config: CorsConfig,
}

impl CorsMiddleware {
    /// Create a new CORS middleware
    pub fn new(config: AppConfig) -> Self {
        let cors_config = CorsConfig::from_app_config(&config);
        info!("CORS configuration loaded; headers are applied by the reverse proxy");

        Self { config: cors_config }
    }

    /// Get CORS configuration
    pub fn get_cors_config(&self) -> &CorsConfig {
        &self.config
    }

    /// Check if CORS allows any origin
    pub fn allows_any_origin(&self) -> bool {
        self.config.origins.contains(&"*".to_string())
    }

    /// Validate CORS configuration
    pub fn validate_config(&self) -> Result<(), String> {
        if !self.allows_any_origin() {
            for origin in &self.config.origins {
                if !self.is_valid_origin(origin) {
                    return Err(format!("Invalid CORS origin: {}", origin));
                }
            }
        }

        for method in &self.config.methods {
            if method.parse::<warp::http::Method>().is_err() {
                return Err(format!("Invalid CORS method: {}", method));
            }
        }

        for header in &self.config.headers {
            if header.is_empty() {
                return Err(format!("Invalid CORS header: {}", header));
            }
        }

        Ok(())
    }

    /// Check if an origin is valid
    fn is_valid_origin(&self, origin: &str) -> bool {
        if origin == "*" {
            return true;
        }

        origin.starts_with("http://") || origin.starts_with("https://")
    }

    /// Get CORS preflight response headers (for the proxy configuration)
    pub fn get_preflight_headers(&self) -> Vec<(String, String)> {
        let mut headers = Vec::new();

        if self.allows_any_origin() {
            headers.push(("Access-Control-Allow-Origin".to_string(), "*".to_string()));
        } else {
            headers.push(("Access-Control-Allow-Origin".to_string(), "null".to_string()));
        }

        let methods = self.config.methods.join(", ");
        headers.push(("Access-Control-Allow-Methods".to_string(), methods));

        let allowed_headers = self.config.headers.join(", ");
        headers.push(("Access-Control-Allow-Headers".to_string(), allowed_headers));

        headers.push(("Access-Control-Max-Age".to_string(), "3600".to_string()));

        headers
    }
}
