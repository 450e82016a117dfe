//! Catalog endpoints and delete cascades.

use actix_web::test;
use serde_json::json;

use job_catalog_lib::db::feedbacks;
use job_catalog_lib::models::FeedbackInput;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_contract_keyed_by_type_code() {
    let pool = create_test_pool().await;
    seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/contract/SE").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["description"], "Senior");

    let req = test::TestRequest::put()
        .uri("/api/contract/SE")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "type_code": "EX", "description": "Executive" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert!(body["fields"]["type_code"].is_array());

    let req = test::TestRequest::patch()
        .uri("/api/contract/SE")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "description": "Senior-level" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["description"], "Senior-level");

    let req = test::TestRequest::get().uri("/api/contract/ZZ").to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_delete_job_title_cascades() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let doomed = seed_job(&pool, job_input(cat.titles[0], 2023, cat.us, 100_000)).await;
    seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 110_000)).await;
    let kept = seed_job(&pool, job_input(cat.titles[1], 2024, cat.us, 120_000)).await;
    let new = FeedbackInput {
        job: doomed.id,
        author: cat.candidate,
        comment: "Gone soon".to_string(),
        rating: 3,
    }
    .validate()
    .unwrap();
    feedbacks::insert(pool.connection(), &new).await.unwrap();
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/job-title/{}", cat.titles[0]))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["id"], kept.id);

    let req = test::TestRequest::get().uri("/api/feedbacks").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 0);
}

#[actix_rt::test]
async fn test_delete_industry_clears_reference() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/industry")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "name": "Finance" }))
        .to_request();
    let (status, industry) = call_json(&app, req).await;
    assert_eq!(status, 201);

    let mut payload = job_json(cat.titles[0], 2024, cat.us, "100000");
    payload["industry"] = industry["id"].clone();
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, job) = call_json(&app, req).await;
    assert_eq!(status, 201, "create failed: {}", job);
    assert_eq!(job["industry"]["name"], "Finance");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/industry/{}", industry["id"]))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", job["id"]))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(body["industry"].is_null());
}

#[actix_rt::test]
async fn test_delete_candidate_removes_authored_feedback() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    let new = FeedbackInput {
        job: job.id,
        author: cat.candidate,
        comment: "Would apply again".to_string(),
        rating: 5,
    }
    .validate()
    .unwrap();
    feedbacks::insert(pool.connection(), &new).await.unwrap();
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/candidate/{}", cat.candidate))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    let req = test::TestRequest::get().uri("/api/feedbacks").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 0);

    // The job record did not belong to the candidate, so it stays
    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", job.id))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);
}

#[actix_rt::test]
async fn test_non_numeric_id_is_not_found() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/skill/abc").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}
