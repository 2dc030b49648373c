//! Integration tests for the HTTP surface
//!
//! These tests assemble the full route stack over the mock upstream
//! adapters and drive it through `warp::test`, asserting on the response
//! envelope every endpoint shares and on the status codes the error
//! taxonomy maps to.

use crate::{
    application::{
        services::{DepositService, MetricsService, QuoteService},
        use_cases::{GetMetricsUseCase, HealthCheckUseCase},
    },
    config::AppConfig,
    infrastructure::adapters::{AttemptStore, MonitoringAdapter, PropertyApi},
    infrastructure::http::{responses::handle_rejection, routes::RouteBuilder},
    middleware::rate_limit::RateLimitMiddleware,
    shared::error::AppError,
    tests::{
        common::{fixtures, MockCardGateway, MockPropertyApi},
        config,
        fixtures::{payloads, requests},
        utils::{assert_error_envelope, assert_success_envelope, body_json},
    },
};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::test::request;
use warp::Filter;

/// Mock upstream handles for one assembled application
struct TestApp {
    api: Arc<MockPropertyApi>,
    gateway: Arc<MockCardGateway>,
    attempts: Arc<AttemptStore>,
}

/// Assemble the production route stack, including the rejection handler,
/// over mock adapters
fn create_app(
    app_config: AppConfig,
) -> (
    TestApp,
    impl Filter<Extract = impl warp::Reply, Error = std::convert::Infallible> + Clone,
) {
    config::init();
    let config_arc = Arc::new(app_config.clone());
    let api = Arc::new(MockPropertyApi::new());
    let gateway = Arc::new(MockCardGateway::new());
    let attempts = Arc::new(AttemptStore::new());
    let metrics_service = Arc::new(MetricsService::new());
    let monitoring = Arc::new(MonitoringAdapter::new());

    let quote_service = Arc::new(QuoteService::new(config_arc.clone(), api.clone()));
    let deposit_service = Arc::new(DepositService::new(
        config_arc,
        api.clone(),
        gateway.clone(),
        attempts.clone(),
        metrics_service.clone(),
        monitoring.clone(),
    ));

    let rejection_config = app_config.clone();
    let routes = RouteBuilder::build_routes(
        app_config.clone(),
        quote_service,
        deposit_service,
        Arc::new(GetMetricsUseCase::new(metrics_service.clone())),
        Arc::new(HealthCheckUseCase::new()),
        metrics_service,
        monitoring,
        Arc::new(RateLimitMiddleware::new(app_config)),
        Some(api.clone() as Arc<dyn PropertyApi>),
    )
    .recover(move |rejection| handle_rejection(rejection, rejection_config.clone()));

    (
        TestApp {
            api,
            gateway,
            attempts,
        },
        routes,
    )
}

#[tokio::test]
async fn test_quote_endpoint_returns_enveloped_breakdown() {
    let (app, routes) = create_app(config::test_config());
    app.api.push_quote(Ok(payloads::quote_with_rent(1000))).await;

    let res = request()
        .method("POST")
        .path("/quote")
        .header("x-forwarded-for", "127.0.0.1")
        .json(&requests::quote_body("101"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let data = assert_success_envelope(&body);

    assert_eq!(data["nightlyCharge"], "1000");
    assert_eq!(data["nights"], 4);
    assert_eq!(data["cleaningFee"], "100");
    assert_eq!(data["taxAmount"], "148.50");
    assert_eq!(data["subtotal"], "1100");
    assert_eq!(data["grandTotal"], "1248.50");
    assert_eq!(data["bookingAmount"], "55.00");
    assert!(data.get("petFee").is_none());
}

#[tokio::test]
async fn test_quote_endpoint_includes_pet_fee_for_pet_stays() {
    let (app, routes) = create_app(config::test_config());
    app.api
        .push_quote(Ok(payloads::quote_with_fees_total(1000, 120)))
        .await;
    app.api
        .push_quote(Ok(payloads::quote_with_fees_total(1000, 70)))
        .await;

    let res = request()
        .method("POST")
        .path("/quote")
        .json(&requests::quote_body_with_pets("101", 2))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let data = assert_success_envelope(&body);
    assert_eq!(data["petFee"], "50");
    assert_eq!(app.api.quote_calls().await.len(), 2);
}

#[tokio::test]
async fn test_quote_endpoint_rejects_malformed_bodies() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("POST")
        .path("/quote")
        .header("content-type", "application/json")
        .body("{\"propertyId\":")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let message = assert_error_envelope(&body_json(res.body()));
    assert!(message.starts_with("Invalid request body"));

    // Structurally valid JSON missing required fields is also a body error
    let res = request()
        .method("POST")
        .path("/quote")
        .json(&serde_json::json!({ "fromDate": "2026-09-01" }))
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_endpoint_maps_validation_failures_to_400() {
    let (app, routes) = create_app(config::test_config());

    let mut body = requests::quote_body("101");
    body["fromDate"] = serde_json::json!("2026-09-05");
    body["toDate"] = serde_json::json!("2026-09-01");

    let res = request()
        .method("POST")
        .path("/quote")
        .json(&body)
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&body_json(res.body()));
    assert!(app.api.quote_calls().await.is_empty());
}

#[tokio::test]
async fn test_verify_endpoint_shapes_the_deposit_envelope() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let data = assert_success_envelope(&body);

    assert_eq!(data["reservationId"], "12345");
    assert_eq!(data["depositAmount"], "50.00");
    assert_eq!(data["total"], "1000.00");
    assert_eq!(data["currency"], "USD");
    assert_eq!(data["dates"]["fromDate"], "2026-09-01");
    assert_eq!(data["dates"]["toDate"], "2026-09-05");
}

#[tokio::test]
async fn test_verify_endpoint_requires_the_reservation_id_parameter() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let message = assert_error_envelope(&body_json(res.body()));
    assert!(message.contains("query"));
}

#[tokio::test]
async fn test_verify_endpoint_masks_upstream_details_in_production() {
    let (app, routes) = create_app(config::production_test_config());
    app.api
        .push_reservation(Ok(payloads::reservation_without_total()))
        .await;

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(res.body());
    let message = assert_error_envelope(&body);
    assert_eq!(message, "Unable to verify the deposit for this reservation");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_authorize_endpoint_returns_the_transaction_envelope() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    let data = assert_success_envelope(&body);

    assert_eq!(data["transactionId"], fixtures::TEST_TRANSACTION_ID);
    assert_eq!(data["amount"], "50.00");
    assert_eq!(data["currency"], "USD");
    assert_eq!(data["reservationNumber"], fixtures::TEST_RESERVATION_NUMBER);
}

#[tokio::test]
async fn test_authorize_endpoint_rejects_bodies_without_card_data() {
    let (app, routes) = create_app(config::test_config());

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body_without_card("12345"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_error_envelope(&body_json(res.body()));
    assert!(app.gateway.authorize_calls().await.is_empty());
}

#[tokio::test]
async fn test_authorize_endpoint_maps_declines_to_402() {
    let (app, routes) = create_app(config::test_config());
    app.gateway
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
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(message, "This transaction has been declined.");
}

#[tokio::test]
async fn test_authorize_endpoint_reports_booking_failure_after_void() {
    let (app, routes) = create_app(config::production_test_config());
    app.api
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
    let body = body_json(res.body());
    let message = assert_error_envelope(&body);
    assert_eq!(
        message,
        "The booking could not be completed. You have not been charged"
    );
    assert!(body.get("details").is_none());

    // The captured charge was released
    assert_eq!(
        app.gateway.void_calls().await,
        vec![fixtures::TEST_TRANSACTION_ID.to_string()]
    );
}

#[tokio::test]
async fn test_authorize_endpoint_maps_duplicate_attempts_to_409() {
    let (app, routes) = create_app(config::test_config());
    let _lease = AttemptStore::lease(&app.attempts, "12345").unwrap();

    let res = request()
        .method("POST")
        .path("/payments/deposit/authorize")
        .json(&requests::authorize_body("12345"))
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::CONFLICT);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(
        message,
        "A payment for this reservation is already being processed"
    );
}

#[tokio::test]
async fn test_unknown_paths_get_the_enveloped_404() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("GET")
        .path("/payments/refund")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(message, "Not found");
}

#[tokio::test]
async fn test_wrong_method_gets_the_enveloped_405() {
    let (_app, routes) = create_app(config::test_config());

    let res = request().method("GET").path("/quote").reply(&routes).await;

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    let message = assert_error_envelope(&body_json(res.body()));
    assert_eq!(message, "Method not allowed");
}

#[tokio::test]
async fn test_client_rate_limit_answers_429_with_the_envelope() {
    let mut throttled = config::test_config();
    throttled.rate_limit.enabled = true;
    throttled.rate_limit.requests_per_minute = 2;
    throttled.rate_limit.burst_size = 1;
    let (app, routes) = create_app(throttled);
    app.api.push_quote(Ok(payloads::quote_with_rent(1000))).await;

    let first = request()
        .method("POST")
        .path("/quote")
        .json(&requests::quote_body("101"))
        .reply(&routes)
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    let second = request()
        .method("POST")
        .path("/quote")
        .json(&requests::quote_body("101"))
        .reply(&routes)
        .await;
    assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
    let message = assert_error_envelope(&body_json(second.body()));
    assert_eq!(message, "Too many requests, please retry shortly");
}

#[tokio::test]
async fn test_health_endpoint_reports_upstream_connectivity() {
    let (app, routes) = create_app(config::test_config());

    let res = request().method("GET").path("/health").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["details"]["upstream"]["status"], "connected");

    // An unreachable upstream degrades the report but keeps serving
    app.api.set_available(false).await;
    let res = request().method("GET").path("/health").reply(&routes).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["details"]["upstream"]["available"], false);
}

#[tokio::test]
async fn test_metrics_endpoint_reflects_served_requests() {
    let (app, routes) = create_app(config::test_config());
    app.api.push_quote(Ok(payloads::quote_with_rent(1000))).await;

    let quote_res = request()
        .method("POST")
        .path("/quote")
        .json(&requests::quote_body("101"))
        .reply(&routes)
        .await;
    assert_eq!(quote_res.status(), StatusCode::OK);

    let res = request()
        .method("GET")
        .path("/metrics")
        .reply(&routes)
        .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = body_json(res.body());
    assert_eq!(body["total_requests"], 1);
    assert_eq!(body["quotes_served"], 1);
    assert_eq!(body["failed_requests"], 0);
}

#[tokio::test]
async fn test_prometheus_endpoint_renders_the_text_exposition() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("GET")
        .path("/metrics/prometheus")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    let text = std::str::from_utf8(res.body()).unwrap();
    assert!(text.contains("# HELP"));
    assert!(text.contains("booking_requests_total"));
    assert!(text.contains("booking_deposit_authorizations_total"));
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let (_app, routes) = create_app(config::test_config());

    let res = request()
        .method("GET")
        .path("/payments/deposit/verify?reservation_id=12345")
        .reply(&routes)
        .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-content-type-options"));
    assert!(res.headers().contains_key("content-security-policy"));
}
