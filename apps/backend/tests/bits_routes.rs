mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use common::{as_user, doc, state_with};
use jobboard::store::{Collection, Filter, MemoryStore, RecordStore};
use jobboard::test_support::create_test_app_builder;
use serde_json::{json, Value};

/// Bits from applicant a@x.com to employer b@x.com, plus one unrelated bit.
async fn seeded_store() -> (Arc<MemoryStore>, Vec<String>) {
    let store = Arc::new(MemoryStore::new());
    let mut ids = Vec::new();
    for body in [
        json!({"userEmail": "a@x.com", "employer_email": "b@x.com", "status": "pending"}),
        json!({"userEmail": "a@x.com", "employer_email": "b@x.com", "status": "accepted"}),
        json!({"userEmail": "a@x.com", "employer_email": "b@x.com"}),
        json!({"userEmail": "c@x.com", "employer_email": "d@x.com", "status": "pending"}),
    ] {
        let ack = store.insert(Collection::Bits, doc(body)).await.unwrap();
        ids.push(ack.inserted_id);
    }
    (store, ids)
}

fn statuses(bits: &[Value]) -> Vec<Option<&str>> {
    bits.iter().map(|b| b.get("status").and_then(Value::as_str)).collect()
}

#[actix_web::test]
async fn any_session_lists_every_bit() {
    let (store, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(test::TestRequest::get().uri("/bits"), "z@x.com").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let bits: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(bits.len(), 4);
}

#[actix_web::test]
async fn own_bits_are_sorted_by_status() {
    let (store, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(test::TestRequest::get().uri("/bits/a@x.com"), "a@x.com").to_request();
    let bits: Vec<Value> = test::read_body_json(test::call_service(&app, req).await).await;

    assert_eq!(statuses(&bits), vec![None, Some("accepted"), Some("pending")]);
    assert!(bits.iter().all(|b| b["userEmail"] == "a@x.com"));
}

#[actix_web::test]
async fn bit_requests_are_scoped_to_the_employer() {
    let (store, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(test::TestRequest::get().uri("/bits-requests/b@x.com"), "b@x.com").to_request();
    let bits: Vec<Value> = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(bits.len(), 3);
    assert!(bits.iter().all(|b| b["employer_email"] == "b@x.com"));

    // The applicant has no requests as an employer
    let req = as_user(test::TestRequest::get().uri("/bits-requests/a@x.com"), "a@x.com").to_request();
    let bits: Vec<Value> = test::read_body_json(test::call_service(&app, req).await).await;
    assert!(bits.is_empty());
}

#[actix_web::test]
async fn either_party_can_fetch_a_bit() {
    let (store, ids) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();
    let id = &ids[0];

    for email in ["a@x.com", "b@x.com"] {
        let req = as_user(
            test::TestRequest::get().uri(&format!("/bits/{email}/{id}")),
            email,
        )
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{email}");
        let bit: Value = test::read_body_json(resp).await;
        assert_eq!(bit["_id"], id.as_str());
    }

    // A third party sees nothing, not even that the bit exists
    let req = as_user(
        test::TestRequest::get().uri(&format!("/bits/c@x.com/{id}")),
        "c@x.com",
    )
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "BIT_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn create_bit_as_applicant() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();

    let req = as_user(test::TestRequest::post().uri("/bits"), "a@x.com")
        .set_json(json!({
            "userEmail": "a@x.com",
            "employer_email": "b@x.com",
            "status": "pending",
            "coverLetter": "hello"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let ack: Value = test::read_body_json(resp).await;
    let id = ack["insertedId"].as_str().unwrap().to_string();
    let stored = store
        .find_one(Collection::Bits, &Filter::by_id(&id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored["coverLetter"], "hello");
}

#[actix_web::test]
async fn applicant_progress_only_writes_status_and_progress() {
    let (store, ids) = seeded_store().await;
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();
    let id = &ids[1];

    let req = as_user(
        test::TestRequest::patch().uri(&format!("/bits/a@x.com/{id}")),
        "a@x.com",
    )
    .set_json(json!({
        "updatedData": {"status": "in progress", "progress": 40, "userEmail": "evil@x.com"}
    }))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);

    let bit = store
        .find_one(Collection::Bits, &Filter::by_id(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bit["status"], "in progress");
    assert_eq!(bit["progress"], 40);
    assert_eq!(bit["userEmail"], "a@x.com");
}

#[actix_web::test]
async fn progress_body_without_updated_data_is_400() {
    let (store, ids) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(
        test::TestRequest::patch().uri(&format!("/bits/a@x.com/{}", ids[0])),
        "a@x.com",
    )
    .set_json(json!({"status": "done"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_BODY",
        StatusCode::BAD_REQUEST,
        None,
    )
    .await;
}

#[actix_web::test]
async fn employer_updates_request_status() {
    let (store, ids) = seeded_store().await;
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();
    let id = &ids[0];

    let req = as_user(
        test::TestRequest::patch().uri(&format!("/bits-request/b@x.com/{id}")),
        "b@x.com",
    )
    .set_json(json!({"status": "accepted"}))
    .to_request();
    let ack: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(ack["matchedCount"], 1);

    // The applicant cannot act as the employer on their own bit
    let req = as_user(
        test::TestRequest::patch().uri(&format!("/bits-request/a@x.com/{id}")),
        "a@x.com",
    )
    .set_json(json!({"status": "hired"}))
    .to_request();
    let ack: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(ack["matchedCount"], 0);

    let bit = store
        .find_one(Collection::Bits, &Filter::by_id(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bit["status"], "accepted");
}

#[actix_web::test]
async fn progress_can_clear_status_with_null() {
    let (store, ids) = seeded_store().await;
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();
    let id = &ids[0];

    let req = as_user(
        test::TestRequest::patch().uri(&format!("/bits/a@x.com/{id}")),
        "a@x.com",
    )
    .set_json(json!({"updatedData": {"status": null}}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["modifiedCount"], 1);

    let bit = store
        .find_one(Collection::Bits, &Filter::by_id(id))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(bit["status"], Value::Null);
}
