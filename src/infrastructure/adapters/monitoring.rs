//! Monitoring adapter for metrics and observability
//!
//! This adapter handles Prometheus metrics collection for the booking API.

use std::sync::atomic::{AtomicU64, AtomicU32, Ordering};

/// Adapter for monitoring and metrics services
pub struct MonitoringAdapter {
    prometheus_registry: prometheus::Registry,
    request_counter: prometheus::Counter,
    quote_counter: prometheus::Counter,
    authorization_counter: prometheus::Counter,
    decline_counter: prometheus::Counter,
    void_counter: prometheus::Counter,
    response_time_histogram: prometheus::Histogram,
    active_connections_gauge: prometheus::Gauge,
    rate_limited_requests: AtomicU64,
    total_response_time: AtomicU64,
    response_count: AtomicU64,
    active_connections: AtomicU32,
}

impl MonitoringAdapter {
    /// Create a new monitoring adapter
    pub fn new() -> Self {
        let registry = prometheus::Registry::new();

        // Create Prometheus metrics
        let request_counter = prometheus::Counter::new(
            "booking_requests_total",
            "Total number of API requests"
        ).unwrap();

        let quote_counter = prometheus::Counter::new(
            "booking_quotes_total",
            "Total number of quote breakdowns served"
        ).unwrap();

        let authorization_counter = prometheus::Counter::new(
            "booking_deposit_authorizations_total",
            "Total number of captured deposit authorizations"
        ).unwrap();

        let decline_counter = prometheus::Counter::new(
            "booking_deposit_declines_total",
            "Total number of gateway declines"
        ).unwrap();

        let void_counter = prometheus::Counter::new(
            "booking_voids_total",
            "Total number of compensating voids attempted"
        ).unwrap();

        let response_time_histogram = prometheus::Histogram::with_opts(
            prometheus::HistogramOpts::new(
                "booking_response_time_seconds",
                "API response time in seconds"
            )
        ).unwrap();

        let active_connections_gauge = prometheus::Gauge::new(
            "booking_active_connections",
            "Number of active connections"
        ).unwrap();

        // Register metrics with registry
        registry.register(Box::new(request_counter.clone())).unwrap();
        registry.register(Box::new(quote_counter.clone())).unwrap();
        registry.register(Box::new(authorization_counter.clone())).unwrap();
        registry.register(Box::new(decline_counter.clone())).unwrap();
        registry.register(Box::new(void_counter.clone())).unwrap();
        registry.register(Box::new(response_time_histogram.clone())).unwrap();
        registry.register(Box::new(active_connections_gauge.clone())).unwrap();

        Self {
            prometheus_registry: registry,
            request_counter,
            quote_counter,
            authorization_counter,
            decline_counter,
            void_counter,
            response_time_histogram,
            active_connections_gauge,
            rate_limited_requests: AtomicU64::new(0),
            total_response_time: AtomicU64::new(0),
            response_count: AtomicU64::new(0),
            active_connections: AtomicU32::new(0),
        }
    }

    /// Record one handled request and its duration
    pub fn record_request(&self, response_time_ms: f64) {
        self.request_counter.inc();
        self.response_time_histogram.observe(response_time_ms / 1000.0);
        self.total_response_time.fetch_add(response_time_ms as u64, Ordering::Relaxed);
        self.response_count.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a served quote breakdown
    pub fn record_quote(&self) {
        self.quote_counter.inc();
    }

    /// Record a captured deposit authorization
    pub fn record_authorization(&self) {
        self.authorization_counter.inc();
    }

    /// Record a gateway decline
    pub fn record_decline(&self) {
        self.decline_counter.inc();
    }

    /// Record a compensating void attempt
    pub fn record_void(&self) {
        self.void_counter.inc();
    }

    /// Get Prometheus metrics in text format
    pub fn get_prometheus_metrics(&self) -> String {
        use prometheus::Encoder;
        let mut buffer = Vec::new();
        let encoder = prometheus::TextEncoder::new();
        encoder.encode(&self.prometheus_registry.gather(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    /// Record rate limited request
    pub fn record_rate_limited_request(&self) {
        self.rate_limited_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment active connections
    pub fn increment_active_connections(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections_gauge.inc();
    }

    /// Decrement active connections
    pub fn decrement_active_connections(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
        self.active_connections_gauge.dec();
    }

    /// Get metrics summary
    pub fn get_metrics(&self) -> MetricsSummary {
        let total_requests = self.request_counter.get();
        let avg_response_time = if self.response_count.load(Ordering::Relaxed) > 0 {
            self.total_response_time.load(Ordering::Relaxed) as f64 / self.response_count.load(Ordering::Relaxed) as f64
        } else {
            0.0
        };

        MetricsSummary {
            total_requests,
            avg_response_time_ms: avg_response_time,
            active_connections: self.active_connections.load(Ordering::Relaxed),
            rate_limited_requests: self.rate_limited_requests.load(Ordering::Relaxed),
        }
    }
}

impl Default for MonitoringAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Metrics summary for monitoring
pub struct MetricsSummary {
    pub total_requests: f64,
    pub avg_response_time_ms: f64,
    pub active_connections: u32,
    pub rate_limited_requests: u64,
}
