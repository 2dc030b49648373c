//! Health routes module
//!
//! This module contains health check route configurations.

use crate::{
    application::use_cases::HealthCheckUseCase,
    config::AppConfig,
    infrastructure::adapters::PropertyApi,
    infrastructure::http::{
        handlers::handle_health_request,
        utils::{with_config, with_health_use_case, with_property_api},
    },
};
use std::sync::Arc;
use warp::Filter;

/// Health routes configuration
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the health check endpoint route
    pub fn create_health_route(
        config: AppConfig,
        health_use_case: Arc<HealthCheckUseCase>,
        property_api: Option<Arc<dyn PropertyApi>>,
    ) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
        warp::path("health")
            .and(warp::path::end())
            .and(warp::get())
            .and(with_health_use_case(health_use_case))
            .and(with_config(config))
            .and(with_property_api(property_api))
            .and_then(handle_health_request)
    }
}
