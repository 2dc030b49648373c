//! Security tests
//!
//! These assert on what must NOT appear in responses: upstream internals,
//! raw error details outside development mode, and card data anywhere.

use crate::{
    application::services::{DepositAuthorizeRequest, DepositService, MetricsService},
    config::AppConfig,
    infrastructure::adapters::{AttemptStore, MonitoringAdapter},
    infrastructure::http::routes::PaymentsRoutes,
    middleware::rate_limit::RateLimitMiddleware,
    shared::error::AppError,
    tests::{
        common::{fixtures, MockCardGateway, MockPropertyApi},
        config,
        fixtures::requests,
        utils::{assert_error_envelope, body_json},
    },
};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::test::request;
use warp::Filter;

/// Payments routes over mock upstreams
struct PaymentsStack {
    api: Arc<MockPropertyApi>,
    gateway: Arc<MockCardGateway>,
}

fn create_payments_stack(
    app_config: AppConfig,
) -> (
    PaymentsStack,
    impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone,
) {
    let api = Arc::new(MockPropertyApi::new());
    let gateway = Arc::new(MockCardGateway::new());
    let metrics_service = Arc::new(MetricsService::new());
    let monitoring = Arc::new(MonitoringAdapter::new());

    let service = Arc::new(DepositService::new(
        Arc::new(app_config.clone()),
        api.clone(),
        gateway.clone(),
        Arc::new(AttemptStore::new()),
        metrics_service.clone(),
        monitoring.clone(),
    ));

    let routes = PaymentsRoutes::create_routes(
        app_config.clone(),
        service,
        metrics_service,
        monitoring,
        Arc::new(RateLimitMiddleware::new(app_config)),
    );

    (PaymentsStack { api, gateway }, routes)
}

#[tokio::test]
async fn test_development_mode_surfaces_error_details() {
    let (stack, routes) = create_payments_stack(config::test_config());
    stack
        .api
        .push_reservation(Err(AppError::Upstream(
            "lodgix account 42 rejected the request".to_string(),
        )))
        .await;

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res.body());
    let message = assert_error_envelope(&body);
    assert_eq!(message, "Internal server error");

    let details = body["details"].as_str().unwrap();
    assert!(details.contains("lodgix account 42"));
}

#[tokio::test]
async fn test_production_mode_withholds_error_details() {
    let (stack, routes) = create_payments_stack(config::production_test_config());
    stack
        .api
        .push_reservation(Err(AppError::Upstream(
            "lodgix account 42 rejected the request".to_string(),
        )))
        .await;

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res.body());
    let message = assert_error_envelope(&body);
    assert_eq!(message, "Internal server error");
    assert!(body.get("details").is_none());

    let raw = String::from_utf8_lossy(res.body());
    assert!(!raw.contains("lodgix"));
}

#[tokio::test]
async fn test_verification_failures_use_a_fixed_client_message() {
    let (stack, routes) = create_payments_stack(config::production_test_config());
    stack
        .api
        .push_reservation(Err(AppError::Verification(
            "no usable total in upstream payload for reservation 12345".to_string(),
        )))
        .await;

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(message, "Unable to verify the deposit for this reservation");

    let raw = String::from_utf8_lossy(res.body());
    assert!(!raw.contains("payload"));
}

#[tokio::test]
async fn test_upstream_auth_failures_read_as_configuration_errors() {
    let (stack, routes) = create_payments_stack(config::production_test_config());
    stack
        .api
        .push_reservation(Err(AppError::UpstreamAuth(
            "basic auth rejected for account 42".to_string(),
        )))
        .await;

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(message, "Payment system configuration error");

    let raw = String::from_utf8_lossy(res.body());
    assert!(!raw.contains("basic auth"));
}

#[tokio::test]
async fn test_card_data_never_echoes_in_responses() {
    // Development mode is the worst case: details are included
    let (stack, routes) = create_payments_stack(config::test_config());

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let raw = String::from_utf8_lossy(res.body());
    assert!(!raw.contains("4111111111111111"));
    assert!(!raw.contains("cardNumber"));
    assert!(!raw.contains("cardCode"));

    // Declines carry the gateway reason, never the card
    stack
        .gateway
        .push_authorize(Err(AppError::GatewayDeclined(
            "This transaction has been declined.".to_string(),
        )))
        .await;
    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    let raw = String::from_utf8_lossy(res.body());
    assert!(!raw.contains("4111111111111111"));
}

#[test]
fn test_request_and_card_debug_output_is_masked() {
    let output = format!("{:?}", fixtures::test_card());
    assert!(!output.contains("4111111111111111"));
    assert!(output.contains("****1111"));

    let payment = DepositAuthorizeRequest {
        card_number: "4111 1111 1111 1111".to_string(),
        ..fixtures::test_authorize_request()
    };
    let output = format!("{:?}", payment);
    assert!(!output.contains("4111 1111"));
    assert!(!output.contains("4111111111111111"));
    assert!(output.contains("****1111"));
    assert!(output.contains("12345"));
}

#[tokio::test]
async fn test_decline_reason_passes_through_without_gateway_internals() {
    let (stack, routes) = create_payments_stack(config::production_test_config());
    stack
        .gateway
        .push_authorize(Err(AppError::GatewayDeclined(
            "Insufficient funds.".to_string(),
        )))
        .await;

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::PAYMENT_REQUIRED);
    let message = assert_error_envelope(&body_json(res.body()));
    // The cardholder-facing reason is the one surface that passes verbatim
    assert_eq!(message, "Insufficient funds.");
}

#[tokio::test]
async fn test_booking_failure_message_promises_no_charge() {
    let (stack, routes) = create_payments_stack(config::production_test_config());
    stack
        .api
        .push_confirmation(Err(AppError::Upstream(
            "reservation confirmation: upstream returned 500".to_string(),
        )))
        .await;

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(
        message,
        "The booking could not be completed. You have not been charged"
    );
    assert_eq!(stack.gateway.void_calls().await.len(), 1);
}
