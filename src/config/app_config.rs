//! Application configuration structures
//!
//! This module contains the main configuration structures for the application.

use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use validator::Validate;

/// Lodgix property-management API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LodgixConfig {
    /// Base API URL
    #[validate(url)]
    pub api_url: String,

    /// Account identifier
    #[validate(length(min = 1))]
    pub account_id: String,

    /// API key
    #[validate(length(min = 1))]
    pub api_key: String,

    /// Connection timeout in seconds (outbound calls stay in single digits)
    #[validate(range(min = 1, max = 9))]
    pub timeout_seconds: u64,

    /// Retry attempts for quote fetches. At most one; reservation
    /// confirmation is never retried regardless of this value.
    #[validate(range(min = 0, max = 1))]
    pub quote_retries: u32,
}

impl Default for LodgixConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.lodgix.com/v2".to_string(),
            account_id: "your-account-id".to_string(),
            api_key: "your-lodgix-api-key".to_string(),
            timeout_seconds: 8,
            quote_retries: 1,
        }
    }
}

/// Authorize.Net card gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AuthorizeNetConfig {
    /// Gateway endpoint URL
    #[validate(url)]
    pub api_url: String,

    /// API login id
    #[validate(length(min = 1))]
    pub api_login_id: String,

    /// Transaction key
    #[validate(length(min = 1))]
    pub transaction_key: String,

    /// Connection timeout in seconds (outbound calls stay in single digits)
    #[validate(range(min = 1, max = 9))]
    pub timeout_seconds: u64,
}

impl Default for AuthorizeNetConfig {
    fn default() -> Self {
        Self {
            api_url: "https://apitest.authorize.net/xml/v1/request.api".to_string(),
            api_login_id: "your-api-login-id".to_string(),
            transaction_key: "your-transaction-key".to_string(),
            timeout_seconds: 6,
        }
    }
}

/// Pricing configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PricingConfig {
    /// Currency code reported when the upstream record carries none
    #[validate(length(min = 3, max = 3))]
    pub default_currency: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            default_currency: "USD".to_string(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServerConfig {
    /// Server address to bind to
    pub bind_address: IpAddr,

    /// Server port
    #[validate(range(min = 1, max = 65535))]
    pub port: u16,

    /// Maximum request size in bytes
    #[validate(range(min = 1024, max = 10485760))] // 1KB to 10MB
    pub max_request_size: usize,

    /// Worker threads (0 for auto-detect)
    #[validate(range(min = 0, max = 64))]
    pub worker_threads: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".parse().unwrap(),
            port: 8080,
            max_request_size: 64 * 1024, // 64KB
            worker_threads: 0, // Auto-detect
        }
    }
}

/// Security configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SecurityConfig {
    /// Allowed CORS origins
    pub cors_origins: Vec<String>,

    /// Allowed CORS methods
    pub cors_methods: Vec<String>,

    /// Allowed CORS headers
    pub cors_headers: Vec<String>,

    /// Enable request logging
    pub enable_request_logging: bool,

    /// Enable security headers
    pub enable_security_headers: bool,

    /// Trusted proxy headers
    pub trusted_proxy_headers: Vec<String>,

    /// Development mode - error responses carry internal details
    pub development_mode: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            cors_origins: vec!["*".to_string()],
            cors_methods: vec!["GET".to_string(), "POST".to_string(), "OPTIONS".to_string()],
            cors_headers: vec![
                "Content-Type".to_string(),
                "Accept".to_string(),
            ],
            enable_request_logging: true,
            enable_security_headers: true,
            trusted_proxy_headers: vec!["X-Forwarded-For".to_string()],
            development_mode: false,
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RateLimitConfig {
    /// Requests per minute per IP
    #[validate(range(min = 1, max = 10000))]
    pub requests_per_minute: u32,

    /// Burst size
    #[validate(range(min = 1, max = 1000))]
    pub burst_size: u32,

    /// Deposit verification attempts per minute per reservation
    #[validate(range(min = 1, max = 100))]
    pub verification_attempts_per_minute: u32,

    /// Enable rate limiting
    pub enabled: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 300,
            burst_size: 50,
            verification_attempts_per_minute: 10,
            enabled: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoggingConfig {
    /// Log level
    #[validate(length(min = 1))]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Lodgix API configuration
    pub lodgix: LodgixConfig,

    /// Authorize.Net gateway configuration
    pub authorize_net: AuthorizeNetConfig,

    /// Pricing configuration
    pub pricing: PricingConfig,

    /// Server configuration
    pub server: ServerConfig,

    /// Security configuration
    pub security: SecurityConfig,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            lodgix: LodgixConfig::default(),
            authorize_net: AuthorizeNetConfig::default(),
            pricing: PricingConfig::default(),
            server: ServerConfig::default(),
            security: SecurityConfig::default(),
            rate_limit: RateLimitConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(config::Environment::with_prefix("RENTAL_BOOKING").separator("__"))
            .build()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to build configuration: {}", e)))?;

        let config: AppConfig = config.try_deserialize()
            .map_err(|e| crate::shared::error::AppError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        // Validate configuration
        config.validate_config()
            .map_err(|e| crate::shared::error::AppError::Validation(format!("Configuration validation failed: {}", e)))?;

        crate::config::ConfigValidator::validate_config(&config)?;

        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> Result<(), validator::ValidationErrors> {
        // Validate each section
        self.lodgix.validate()?;
        self.authorize_net.validate()?;
        self.pricing.validate()?;
        self.server.validate()?;
        self.security.validate()?;
        self.rate_limit.validate()?;
        self.logging.validate()?;

        Ok(())
    }

    /// Get server address as string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.server.bind_address, self.server.port)
    }

    /// Check if CORS is configured for any origin
    pub fn cors_allow_any_origin(&self) -> bool {
        self.security.cors_origins.contains(&"*".to_string())
    }
}
