//! Configuration validation module
//!
//! This module provides additional validation logic for configuration
//! beyond the basic validator crate validation.

use crate::config::AppConfig;
use crate::shared::error::AppError;

/// Configuration validator for additional validation logic
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the complete configuration
    pub fn validate_config(config: &AppConfig) -> crate::Result<()> {
        // Validate upstream API URLs
        Self::validate_upstream_url("Lodgix API", &config.lodgix.api_url)?;
        Self::validate_upstream_url("Authorize.Net", &config.authorize_net.api_url)?;

        // Validate credentials are not placeholders outside development
        Self::validate_credentials(config)?;

        // Validate security settings
        Self::validate_security_config(&config.security)?;

        // Validate rate limiting settings
        Self::validate_rate_limit_config(&config.rate_limit)?;

        Ok(())
    }

    /// Validate an upstream API URL
    fn validate_upstream_url(name: &str, url: &str) -> crate::Result<()> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Validation(
                format!("{} URL must start with http:// or https://", name)
            ));
        }

        if url.contains("localhost") || url.contains("127.0.0.1") {
            // Allow localhost for development
            Ok(())
        } else {
            // For production, ensure HTTPS
            if !url.starts_with("https://") {
                return Err(AppError::Validation(
                    format!("Production {} URL must use HTTPS", name)
                ));
            }
            Ok(())
        }
    }

    /// Reject default placeholder credentials when not in development mode
    fn validate_credentials(config: &AppConfig) -> crate::Result<()> {
        if config.security.development_mode {
            return Ok(());
        }

        if config.lodgix.api_key.starts_with("your-") {
            return Err(AppError::Config(
                "Lodgix API key is not configured".to_string()
            ));
        }

        if config.authorize_net.api_login_id.starts_with("your-")
            || config.authorize_net.transaction_key.starts_with("your-")
        {
            return Err(AppError::Config(
                "Authorize.Net credentials are not configured".to_string()
            ));
        }

        Ok(())
    }

    /// Validate security configuration
    fn validate_security_config(security: &crate::config::app_config::SecurityConfig) -> crate::Result<()> {
        // Check for overly permissive CORS settings
        if security.cors_origins.contains(&"*".to_string()) && security.enable_security_headers {
            tracing::warn!("CORS is configured to allow any origin - this may be a security risk in production");
        }

        // Validate CORS methods
        for method in &security.cors_methods {
            if !["GET", "POST", "PUT", "DELETE", "OPTIONS", "PATCH"].contains(&method.as_str()) {
                return Err(AppError::Validation(
                    format!("Invalid CORS method: {}", method)
                ));
            }
        }

        Ok(())
    }

    /// Validate rate limiting configuration
    fn validate_rate_limit_config(rate_limit: &crate::config::app_config::RateLimitConfig) -> crate::Result<()> {
        if rate_limit.enabled {
            if rate_limit.requests_per_minute == 0 {
                return Err(AppError::Validation(
                    "Rate limiting enabled but requests_per_minute is 0".to_string()
                ));
            }

            if rate_limit.burst_size > rate_limit.requests_per_minute {
                return Err(AppError::Validation(
                    "Burst size cannot be greater than requests per minute".to_string()
                ));
            }
        }

        Ok(())
    }
}
