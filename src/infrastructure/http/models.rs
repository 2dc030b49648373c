//! HTTP models - Infrastructure concerns
//!
//! This module contains models that are specific to infrastructure concerns
//! like HTTP requests/responses, serialization, and external interfaces.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// Uniform response envelope (infrastructure concern)
///
/// Every endpoint answers with this shape: `{success, data}` on success,
/// `{success: false, error, details?}` on failure. `details` carries the
/// internal error text and is only populated in development mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Whether the request succeeded
    pub success: bool,

    /// Payload (for successful responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,

    /// Client-safe error message (for error responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Internal error detail, development mode only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiEnvelope {
    /// Create a successful envelope
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    /// Create an error envelope
    pub fn error(message: String, details: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            details,
        }
    }
}

/// Query parameters for the deposit verification endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct DepositVerifyQuery {
    /// Reservation identifier, numeric string
    pub reservation_id: String,
}

/// HTTP request context for tracking and logging (infrastructure concern)
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique request ID
    pub request_id: String,

    /// Client IP address
    pub client_ip: String,

    /// User agent
    pub user_agent: Option<String>,

    /// Request timestamp
    pub timestamp: chrono::DateTime<chrono::Utc>,

    /// Logical operation name (quote.reconcile, deposit.verify, ...)
    pub operation: String,

    /// Reservation the request concerns, when known
    pub reservation_id: Option<String>,
}

impl RequestContext {
    /// Create a new request context
    pub fn new(client_ip: String, operation: String) -> Self {
        Self {
            request_id: generate_request_id(),
            client_ip,
            user_agent: None,
            timestamp: chrono::Utc::now(),
            operation,
            reservation_id: None,
        }
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Set the reservation this request concerns
    pub fn with_reservation_id(mut self, reservation_id: String) -> Self {
        self.reservation_id = Some(reservation_id);
        self
    }
}

fn generate_request_id() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();

    format!("req_{:x}", now)
}
