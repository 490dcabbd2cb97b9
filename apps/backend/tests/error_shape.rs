mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{test, web, HttpResponse};
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use common::state_with;
use jobboard::error::AppError;
use jobboard::errors::ErrorCode;
use jobboard::store::MemoryStore;
use jobboard::test_support::create_test_app_builder;

async fn failing_store() -> Result<HttpResponse, AppError> {
    Err(AppError::store("connection refused by 10.1.2.3:5432"))
}

async fn failing_validation() -> Result<HttpResponse, AppError> {
    Err(AppError::bad_request(ErrorCode::InvalidBody, "Example failure"))
}

#[actix_web::test]
async fn problem_details_carry_the_request_trace_id() {
    let app = create_test_app_builder(state_with(Arc::new(MemoryStore::new())))
        .with_routes(|cfg| {
            cfg.route("/_test/error", web::get().to(failing_validation));
        })
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::get().uri("/_test/error").to_request();
    let resp = test::call_service(&app, req).await;

    let request_id = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .expect("x-request-id header");

    let problem = assert_problem_details_from_service_response(
        resp,
        "INVALID_BODY",
        StatusCode::BAD_REQUEST,
        Some("Example failure"),
    )
    .await;

    assert_eq!(problem.trace_id, request_id);
    assert_eq!(problem.title, "Invalid Body");
    assert!(problem.type_.ends_with("/INVALID_BODY"));
}

#[actix_web::test]
async fn store_failures_stay_generic() {
    let app = create_test_app_builder(state_with(Arc::new(MemoryStore::new())))
        .with_routes(|cfg| {
            cfg.route("/_test/store", web::get().to(failing_store));
        })
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::get().uri("/_test/store").to_request();
    let resp = test::call_service(&app, req).await;

    let problem = assert_problem_details_from_service_response(
        resp,
        "STORE_FAILURE",
        StatusCode::INTERNAL_SERVER_ERROR,
        None,
    )
    .await;
    assert!(!problem.detail.contains("10.1.2.3"));
}

#[actix_web::test]
async fn error_responses_get_security_headers() {
    let app = create_test_app_builder(state_with(Arc::new(MemoryStore::new())))
        .build()
        .await
        .unwrap();

    let req = test::TestRequest::get().uri("/bits").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let headers = resp.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
}
