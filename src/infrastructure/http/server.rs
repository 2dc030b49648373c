//! HTTP server implementation for reverse proxy deployment
//!
//! This module contains the HTTP server implementation optimized for deployment
//! behind a reverse proxy (nginx, Caddy, etc.) that handles SSL, compression, and CORS.

use crate::{
    application::{
        services::{DepositService, MetricsService, QuoteService},
        use_cases::{GetMetricsUseCase, HealthCheckUseCase},
    },
    config::AppConfig,
    infrastructure::adapters::{
        AttemptStore, AuthorizeNetAdapter, CardGateway, LodgixAdapter, MonitoringAdapter,
        PropertyApi,
    },
    infrastructure::http::{responses::handle_rejection, routes::RouteBuilder},
    middleware::{cors::CorsMiddleware, rate_limit::RateLimitMiddleware},
    shared::error::{AppError, AppResult},
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument};
use warp::{Filter, Reply};

/// How often idle rate-limiter state is swept out
const SWEEP_INTERVAL_SECS: u64 = 60;

/// HTTP server implementation optimized for reverse proxy deployment
pub struct HttpServer {
    config: AppConfig,
    quote_service: Arc<QuoteService>,
    deposit_service: Arc<DepositService>,
    metrics_use_case: Arc<GetMetricsUseCase>,
    health_use_case: Arc<HealthCheckUseCase>,
    metrics_service: Arc<MetricsService>,
    monitoring: Arc<MonitoringAdapter>,
    rate_limit_middleware: Arc<RateLimitMiddleware>,
    property_api: Arc<dyn PropertyApi>,
}

impl HttpServer {
    /// Create a new HTTP server instance optimized for reverse proxy deployment
    pub fn new(config: AppConfig) -> AppResult<Self> {
        // CORS is enforced by the front proxy; a bad origin list should
        // still fail loudly at startup rather than at deploy time.
        CorsMiddleware::new(config.clone())
            .validate_config()
            .map_err(AppError::Config)?;

        // Initialize infrastructure layer
        let config_arc = Arc::new(config.clone());
        let property_api: Arc<dyn PropertyApi> =
            Arc::new(LodgixAdapter::new(config_arc.clone())?);
        let gateway: Arc<dyn CardGateway> = Arc::new(AuthorizeNetAdapter::new(config_arc.clone())?);
        let attempts = Arc::new(AttemptStore::new());
        let monitoring = Arc::new(MonitoringAdapter::new());

        // Initialize application layer
        let metrics_service = Arc::new(MetricsService::new());
        let quote_service = Arc::new(QuoteService::new(config_arc.clone(), property_api.clone()));
        let deposit_service = Arc::new(DepositService::new(
            config_arc,
            property_api.clone(),
            gateway,
            attempts,
            metrics_service.clone(),
            monitoring.clone(),
        ));

        // Initialize use cases
        let metrics_use_case = Arc::new(GetMetricsUseCase::new(metrics_service.clone()));
        let health_use_case = Arc::new(HealthCheckUseCase::new());

        // Initialize rate limiting middleware
        let rate_limit_middleware = Arc::new(RateLimitMiddleware::new(config.clone()));

        Ok(Self {
            config,
            quote_service,
            deposit_service,
            metrics_use_case,
            health_use_case,
            metrics_service,
            monitoring,
            rate_limit_middleware,
            property_api,
        })
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Run the HTTP server optimized for reverse proxy deployment
    #[instrument(skip(self))]
    pub async fn run(self) -> AppResult<()> {
        let addr = self.config.server_address();
        info!("Starting HTTP server on {}", addr);
        info!("SSL/TLS, compression, and CORS should be handled by the reverse proxy");

        let addr: std::net::SocketAddr = addr
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid server address: {}", e)))?;

        self.spawn_sweeper();
        let routes = self.create_routes();

        warp::serve(routes).run(addr).await;

        Ok(())
    }

    /// Periodically drop throttle state for clients and reservations that
    /// have gone quiet, so the keyed limiters do not grow without bound.
    fn spawn_sweeper(&self) {
        let rate_limiter = self.rate_limit_middleware.clone();
        let deposit_service = self.deposit_service.clone();

        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(SWEEP_INTERVAL_SECS));
            loop {
                tick.tick().await;
                rate_limiter.sweep();
                deposit_service.sweep_throttle();
            }
        });
    }

    /// Create the application routes optimized for reverse proxy deployment
    fn create_routes(
        self,
    ) -> impl Filter<Extract = impl Reply, Error = std::convert::Infallible> + Clone {
        let rejection_config = self.config.clone();

        RouteBuilder::build_routes(
            self.config,
            self.quote_service,
            self.deposit_service,
            self.metrics_use_case,
            self.health_use_case,
            self.metrics_service,
            self.monitoring,
            self.rate_limit_middleware,
            Some(self.property_api),
        )
        .recover(move |rejection| handle_rejection(rejection, rejection_config.clone()))
    }
}

/// Create test routes for integration testing
#[cfg(test)]
pub fn create_test_routes(
) -> AppResult<impl Filter<Extract = impl Reply, Error = std::convert::Infallible> + Clone> {
    let mut config = AppConfig::default();
    config.server.port = 0; // Use random port
    config.server.bind_address = "127.0.0.1".parse().unwrap();
    config.security.development_mode = true;
    config.rate_limit.enabled = false;

    let server = HttpServer::new(config)?;
    Ok(server.create_routes())
}
