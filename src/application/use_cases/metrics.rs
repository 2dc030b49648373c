use crate::application::services::MetricsService;
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

/// Use case for getting application metrics
pub struct GetMetricsUseCase {
    metrics_service: Arc<MetricsService>,
}

impl GetMetricsUseCase {
    /// Create a new use case
    pub fn new(metrics_service: Arc<MetricsService>) -> Self {
        Self { metrics_service }
    }

    /// Execute the use case
    pub fn execute(&self) -> Value {
        info!("Getting application metrics");
        self.metrics_service.get_metrics()
    }
}
