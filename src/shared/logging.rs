//! Logging utilities module
//!
//! This module provides centralized logging functionality and utilities.

use tracing::{error, info, warn};
use std::time::{SystemTime, UNIX_EPOCH};

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified configuration
    pub fn initialize(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber_builder = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_thread_ids(true)
            .with_thread_names(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false);

        let subscriber = subscriber_builder.finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| crate::shared::error::AppError::Internal(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }

    /// Log an incoming request with structured data
    pub fn log_request(
        request_id: &str,
        operation: &str,
        client_ip: &str,
        user_agent: Option<&str>,
    ) {
        info!(
            request_id = %request_id,
            operation = %operation,
            client_ip = %client_ip,
            user_agent = user_agent,
            "Processing request"
        );
    }

    /// Log a successful response
    pub fn log_success(request_id: &str, operation: &str, duration_ms: u64) {
        info!(
            request_id = %request_id,
            operation = %operation,
            duration_ms = %duration_ms,
            "Request completed successfully"
        );
    }

    /// Log an error response
    pub fn log_error(request_id: &str, operation: &str, error: &crate::shared::error::AppError, duration_ms: u64) {
        error!(
            request_id = %request_id,
            operation = %operation,
            error = %error,
            duration_ms = %duration_ms,
            "Request failed"
        );
    }

    /// Log payment lifecycle transitions. Card data never appears here;
    /// only reservation and transaction identifiers are logged.
    pub fn log_payment_event(reservation_id: &str, phase: &str, transaction_id: Option<&str>) {
        info!(
            reservation_id = %reservation_id,
            phase = %phase,
            transaction_id = transaction_id,
            "Payment state transition"
        );
    }

    /// Log security events
    pub fn log_security_event(event_type: &str, details: &str, client_ip: &str) {
        warn!(
            event_type = %event_type,
            details = %details,
            client_ip = %client_ip,
            "Security event detected"
        );
    }

    /// Log rate limiting events
    pub fn log_rate_limit(key: &str, scope: &str) {
        warn!(
            key = %key,
            scope = %scope,
            "Rate limit exceeded"
        );
    }

    /// Generate a unique request ID
    pub fn generate_request_id() -> String {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();

        format!("req_{:x}", now)
    }
}
