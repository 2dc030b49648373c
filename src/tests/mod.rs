//! Test suite for the rental booking server
//!
//! This module provides a complete testing framework covering:
//! - Unit tests for services and payment orchestration
//! - Integration tests for HTTP endpoints and envelope shapes
//! - Security tests for error masking and card-data handling
//! - Mock and fixture utilities

pub mod integration;
pub mod security;

/// Test configuration and utilities
pub mod config {
    use crate::config::AppConfig;
    use std::sync::Once;

    static INIT: Once = Once::new();

    /// Initialize test environment
    pub fn init() {
        INIT.call_once(|| {
            // Initialize tracing for tests
            tracing_subscriber::fmt()
                .with_env_filter("debug")
                .with_test_writer()
                .init();
        });
    }

    /// Create test configuration
    pub fn test_config() -> AppConfig {
        let mut config = AppConfig::default();

        // Configure for testing
        config.server.port = 0; // Use random port
        config.server.bind_address = "127.0.0.1".parse().unwrap();
        config.security.development_mode = true;
        config.rate_limit.enabled = false; // Disable rate limiting for tests

        config
    }

    /// Create production-like test configuration
    pub fn production_test_config() -> AppConfig {
        let mut config = test_config();
        config.security.development_mode = false;
        config.rate_limit.enabled = true;
        config
    }
}

/// Test result types
pub type TestResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Test utilities and helpers
pub mod utils {
    use serde_json::Value;

    /// Parse a response body as JSON
    pub fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).expect("response body should be JSON")
    }

    /// Assert the uniform success envelope and return its data payload
    pub fn assert_success_envelope(response: &Value) -> &Value {
        assert!(response.is_object());
        let obj = response.as_object().unwrap();
        assert_eq!(obj["success"], true);
        assert!(obj.contains_key("data"));
        assert!(!obj.contains_key("error"));
        &obj["data"]
    }

    /// Assert the uniform error envelope and return its client message
    pub fn assert_error_envelope(response: &Value) -> String {
        assert!(response.is_object());
        let obj = response.as_object().unwrap();
        assert_eq!(obj["success"], false);
        assert!(!obj.contains_key("data"));
        let message = obj["error"].as_str().expect("error should be a string");
        assert!(!message.is_empty());
        message.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_initialization() {
        config::init();
        let test_config = config::test_config();
        assert!(test_config.security.development_mode);
        assert!(!test_config.rate_limit.enabled);
    }

    #[test]
    fn test_production_config() {
        let prod_config = config::production_test_config();
        assert!(!prod_config.security.development_mode);
        assert!(prod_config.rate_limit.enabled);
    }

    #[test]
    fn test_envelope_assertions() {
        let success = serde_json::json!({
            "success": true,
            "data": { "depositAmount": "50.00" }
        });
        let data = utils::assert_success_envelope(&success);
        assert_eq!(data["depositAmount"], "50.00");

        let error = serde_json::json!({
            "success": false,
            "error": "Not found"
        });
        assert_eq!(utils::assert_error_envelope(&error), "Not found");
    }

    #[test]
    fn test_body_json_parses_bytes() {
        let parsed = utils::body_json(br#"{"success":true,"data":{}}"#);
        assert_eq!(parsed["success"], true);
    }
}
