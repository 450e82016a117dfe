//! Write access and API key management.

use actix_web::test;
use serde_json::json;

use job_catalog_lib::models::ApiKeyRole;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_reads_are_open_writes_need_a_key() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .set_json(job_json(cat.titles[0], 2024, cat.us, "1000"))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "UNAUTHORIZED");

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-API-Key", "jck_not-a-real-key"))
        .set_json(job_json(cat.titles[0], 2024, cat.us, "1000"))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", "wrong-admin-key"))
        .set_json(job_json(cat.titles[0], 2024, cat.us, "1000"))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);

    // Nothing was written
    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 0);
}

#[actix_rt::test]
async fn test_viewer_cannot_write_contributor_can() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let viewer = issue_key(&pool, ApiKeyRole::Viewer).await;
    let contributor = issue_key(&pool, ApiKeyRole::Contributor).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-API-Key", viewer.as_str()))
        .set_json(job_json(cat.titles[0], 2024, cat.us, "1000"))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-API-Key", contributor.as_str()))
        .set_json(job_json(cat.titles[0], 2024, cat.us, "1000"))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201, "contributor write failed: {}", body);

    // Contributors cannot manage keys
    let req = test::TestRequest::get()
        .uri("/api/auth/keys")
        .insert_header(("X-API-Key", contributor.as_str()))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_admin_key_lifecycle() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/keys")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "name": "Nightly import", "role": "contributor", "expires_in": "30d" }))
        .to_request();
    let (status, created) = call_json(&app, req).await;
    assert_eq!(status, 201, "key creation failed: {}", created);
    let key = created["key"].as_str().unwrap().to_string();
    assert!(key.starts_with("jck_"));
    assert!(created["expires_at"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/auth/keys")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["keys"].as_array().unwrap().len(), 1);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/auth/keys/{}", created["id"].as_str().unwrap()))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 200);

    // A revoked key no longer authenticates
    let req = test::TestRequest::post()
        .uri("/api/skill")
        .insert_header(("X-API-Key", key.as_str()))
        .set_json(json!({ "name": "Rust" }))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 401);
}

#[actix_rt::test]
async fn test_unknown_role_is_rejected() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/auth/keys")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "name": "Ops", "role": "superuser" }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert!(body["fields"]["role"].is_array());
}
