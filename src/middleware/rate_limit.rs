//! Per-client rate limiting middleware
//!
//! Keeps one token bucket per client IP. Buckets for idle clients are
//! dropped by the periodic sweep so the key map cannot grow without bound.

use crate::config::AppConfig;
use crate::shared::error::{AppError, AppResult};
use crate::shared::logging::LoggingUtils;
use governor::clock::{Clock, DefaultClock};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

/// Rate limiting middleware keyed by client IP
pub struct RateLimitMiddleware {
    enabled: bool,
    limiter: DefaultKeyedRateLimiter<String>,
    clock: DefaultClock,
}

impl RateLimitMiddleware {
    /// Create a new rate limiting middleware from configuration
    pub fn new(config: AppConfig) -> Self {
        let per_minute = NonZeroU32::new(config.rate_limit.requests_per_minute)
            .unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(config.rate_limit.burst_size).unwrap_or(per_minute);

        Self {
            enabled: config.rate_limit.enabled,
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute).allow_burst(burst)),
            clock: DefaultClock::default(),
        }
    }

    /// Whether rate limiting is active
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Check the limit for a client, consuming one cell on success
    pub fn check_rate_limit(&self, client_ip: &str) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }

        match self.limiter.check_key(&client_ip.to_string()) {
            Ok(_) => Ok(()),
            Err(not_until) => {
                let retry_after_seconds =
                    not_until.wait_time_from(self.clock.now()).as_secs().max(1);
                LoggingUtils::log_rate_limit(client_ip, "request");
                Err(AppError::RateLimited { retry_after_seconds })
            }
        }
    }

    /// Drop buckets for clients that have gone quiet
    pub fn sweep(&self) {
        self.limiter.retain_recent();
    }
}
