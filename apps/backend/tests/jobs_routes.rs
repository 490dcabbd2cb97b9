mod common;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test;
use backend_test_support::problem_details::assert_problem_details_from_service_response;
use common::{as_user, doc, state_with};
use jobboard::store::{Collection, MemoryStore, RecordStore};
use jobboard::test_support::create_test_app_builder;
use serde_json::{json, Value};

async fn seeded_store() -> (Arc<MemoryStore>, String, String) {
    let store = Arc::new(MemoryStore::new());
    let mine = store
        .insert(
            Collection::Jobs,
            doc(json!({"title": "Welder", "category": "trades", "employer_email": "a@x.com"})),
        )
        .await
        .unwrap()
        .inserted_id;
    let theirs = store
        .insert(
            Collection::Jobs,
            doc(json!({"title": "Designer", "category": "creative", "employer_email": "b@x.com"})),
        )
        .await
        .unwrap()
        .inserted_id;
    (store, mine, theirs)
}

#[actix_web::test]
async fn browsing_is_public() {
    let (store, mine, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let resp = test::call_service(&app, test::TestRequest::get().uri("/jobs").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let jobs: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(jobs.len(), 2);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/jobs/creative").to_request(),
    )
    .await;
    let jobs: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Designer");

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri(&format!("/job/{mine}")).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let job: Value = test::read_body_json(resp).await;
    assert_eq!(job["_id"], mine.as_str());
}

#[actix_web::test]
async fn unknown_job_is_404() {
    let (store, _, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/job/does-not-exist").to_request(),
    )
    .await;
    assert_problem_details_from_service_response(
        resp,
        "JOB_NOT_FOUND",
        StatusCode::NOT_FOUND,
        None,
    )
    .await;
}

#[actix_web::test]
async fn posted_jobs_only_lists_the_callers() {
    let (store, mine, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(test::TestRequest::get().uri("/posted-jobs/a@x.com"), "a@x.com").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let jobs: Vec<Value> = test::read_body_json(resp).await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["_id"], mine.as_str());
}

#[actix_web::test]
async fn create_returns_insert_ack() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();

    let req = as_user(test::TestRequest::post().uri("/jobs"), "a@x.com")
        .set_json(json!({"title": "Plumber", "category": "trades", "employer_email": "a@x.com"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["acknowledged"], true);
    assert!(ack["insertedId"].as_str().is_some_and(|id| !id.is_empty()));
    assert_eq!(store.len(Collection::Jobs), 1);
}

#[actix_web::test]
async fn create_without_owner_is_bad_request() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();

    let req = as_user(test::TestRequest::post().uri("/jobs"), "a@x.com")
        .set_json(json!({"title": "Plumber"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_problem_details_from_service_response(
        resp,
        "INVALID_BODY",
        StatusCode::BAD_REQUEST,
        Some("employer_email"),
    )
    .await;
    assert!(store.is_empty(Collection::Jobs));
}

#[actix_web::test]
async fn update_touches_only_own_jobs() {
    let (store, mine, theirs) = seeded_store().await;
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();

    let req = as_user(
        test::TestRequest::put().uri(&format!("/jobs/a@x.com/{mine}")),
        "a@x.com",
    )
    .set_json(json!({"title": "Senior Welder"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["matchedCount"], 1);
    assert_eq!(ack["modifiedCount"], 1);

    // Someone else's job id under the caller's own email matches nothing
    let req = as_user(
        test::TestRequest::put().uri(&format!("/jobs/a@x.com/{theirs}")),
        "a@x.com",
    )
    .set_json(json!({"title": "Hijacked"}))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let ack: Value = test::read_body_json(resp).await;
    assert_eq!(ack["matchedCount"], 0);

    let job = store
        .find_one(Collection::Jobs, &jobboard::store::Filter::by_id(&theirs))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(job["title"], "Designer");
}

#[actix_web::test]
async fn update_cannot_reassign_ownership() {
    let (store, mine, _) = seeded_store().await;
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    for body in [json!({"employer_email": "b@x.com"}), json!({"_id": "other"})] {
        let req = as_user(
            test::TestRequest::put().uri(&format!("/jobs/a@x.com/{mine}")),
            "a@x.com",
        )
        .set_json(body)
        .to_request();
        let resp = test::call_service(&app, req).await;
        assert_problem_details_from_service_response(
            resp,
            "PROTECTED_FIELD",
            StatusCode::BAD_REQUEST,
            None,
        )
        .await;
    }
}

#[actix_web::test]
async fn delete_removes_own_job() {
    let (store, mine, theirs) = seeded_store().await;
    let app = create_test_app_builder(state_with(store.clone()))
        .build()
        .await
        .unwrap();

    let req = as_user(
        test::TestRequest::delete().uri(&format!("/jobs/a@x.com/{theirs}")),
        "a@x.com",
    )
    .to_request();
    let ack: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(ack["deletedCount"], 0);

    let req = as_user(
        test::TestRequest::delete().uri(&format!("/jobs/a@x.com/{mine}")),
        "a@x.com",
    )
    .to_request();
    let ack: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(ack["acknowledged"], true);
    assert_eq!(ack["deletedCount"], 1);

    assert_eq!(store.len(Collection::Jobs), 1);
}

#[actix_web::test]
async fn malformed_json_is_rejected() {
    let store = Arc::new(MemoryStore::new());
    let app = create_test_app_builder(state_with(store)).build().await.unwrap();

    let req = as_user(test::TestRequest::post().uri("/jobs"), "a@x.com")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json")
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
