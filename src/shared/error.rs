//! Error handling module
//!
//! Centralized error taxonomy for the booking API. Every failure that can
//! cross the HTTP boundary maps to exactly one variant here.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Upstream rejected our credentials. The message is internal only;
    /// clients always receive a generic configuration error.
    #[error("Upstream authentication failed: {0}")]
    UpstreamAuth(String),

    /// Deposit verification failed (unreadable reservation, non-positive total).
    #[error("Verification failed: {0}")]
    Verification(String),

    #[error("Rate limit exceeded, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    /// The card gateway declined the authorization. Carries the gateway's
    /// human-readable reason.
    #[error("Payment declined: {0}")]
    GatewayDeclined(String),

    /// A payment for the same reservation is already in flight.
    #[error("Payment already in progress for reservation {0}")]
    DuplicateAttempt(String),

    /// Reservation confirmation failed after a successful authorization.
    /// The authorization has been (best-effort) voided by the time this
    /// surfaces.
    #[error("Booking failed: {0}")]
    DownstreamBooking(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("JSON error: {0}")]
    Json(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Get HTTP status code for this error
    pub fn http_status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Json(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::GatewayDeclined(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::DuplicateAttempt(_) => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::UpstreamAuth(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Verification(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::DownstreamBooking(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to API clients. Variants that may carry
    /// credentials or upstream internals collapse to a generic phrase;
    /// the original text is only exposed via `details` in development mode.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::NotFound(msg) => msg.clone(),
            AppError::GatewayDeclined(reason) => reason.clone(),
            AppError::DuplicateAttempt(_) => {
                "A payment for this reservation is already being processed".to_string()
            }
            AppError::RateLimited { .. } => {
                "Too many requests, please retry shortly".to_string()
            }
            AppError::Json(_) => "Invalid request body".to_string(),
            AppError::UpstreamAuth(_) | AppError::Config(_) => {
                "Payment system configuration error".to_string()
            }
            AppError::Verification(_) => {
                "Unable to verify the deposit for this reservation".to_string()
            }
            AppError::DownstreamBooking(_) => {
                "The booking could not be completed. You have not been charged".to_string()
            }
            AppError::Upstream(_) | AppError::Internal(_) => {
                "Internal server error".to_string()
            }
        }
    }

    /// Whether the client may safely retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RateLimited { .. } | AppError::Upstream(_))
    }
}

/// Application result type
pub type AppResult<T> = Result<T, AppError>;

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Json(err.to_string())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AppError::Upstream(format!("upstream request timed out: {}", err))
        } else if err.is_connect() {
            AppError::Upstream(format!("upstream connection failed: {}", err))
        } else {
            AppError::Upstream(err.to_string())
        }
    }
}
