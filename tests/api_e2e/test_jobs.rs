//! Job record REST scenarios.

use actix_web::test;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_duplicate_triple_is_conflict() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let payload = job_json(cat.titles[0], 2024, cat.us, "150000.00");
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 201, "create failed: {}", body);
    assert_eq!(body["job_title_name"], "Data Scientist");

    // Same title, year and company location with a different salary
    let payload = job_json(cat.titles[0], 2024, cat.us, "99000.00");
    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(&payload)
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 409);
    assert_eq!(body["error"], "CONFLICT");

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["total_count"], 1);
}

#[actix_rt::test]
async fn test_missing_reference_is_field_error() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/jobs")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(job_json(999, 2024, cat.us, "1000"))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["fields"]["job_title"].is_array());
}

#[actix_rt::test]
async fn test_page_beyond_last_is_clamped() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    for year in 2000..2025 {
        seed_job(&pool, job_input(cat.titles[0], year, cat.us, 50_000 + i64::from(year))).await;
    }
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/jobs?page=99").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 25);
    assert_eq!(body["total_pages"], 3);
    assert_eq!(body["current_page"], 3);
    assert_eq!(body["items"].as_array().unwrap().len(), 5);

    let req = test::TestRequest::get().uri("/api/jobs?page=abc").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["items"].as_array().unwrap().len(), 10);
    // Default sort is highest salary first
    assert_eq!(body["items"][0]["work_year"], 2024);
}

#[actix_rt::test]
async fn test_search_and_sort() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[0], 2023, cat.us, 120_000)).await;
    seed_job(&pool, job_input(cat.titles[2], 2023, cat.us, 70_000)).await;
    seed_job(&pool, job_input(cat.titles[2], 2024, cat.de, 80_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/jobs?search=analyst&sort=salary_in_usd")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["sort"], "salary_in_usd");
    assert_eq!(body["items"][0]["work_year"], 2023);

    // REST listing also matches the residence code
    let req = test::TestRequest::get().uri("/api/jobs?search=de").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 1);

    // Unknown sort field falls back to the default
    let req = test::TestRequest::get().uri("/api/jobs?ordering=bogus").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["sort"], "-salary_in_usd");
}

#[actix_rt::test]
async fn test_patch_and_delete() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[1], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/jobs/{}", job.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(serde_json::json!({ "remote_ratio": 100, "candidate": cat.candidate }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200, "patch failed: {}", body);
    assert_eq!(body["remote_ratio"], 100);
    assert_eq!(body["candidate"]["id"], cat.candidate);
    assert_eq!(body["work_year"], 2024);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/jobs/{}", job.id))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 204);

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}", job.id))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_second_page_follows_sort_order() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    for year in 2000..2025 {
        seed_job(&pool, job_input(cat.titles[0], year, cat.us, 50_000 + i64::from(year))).await;
    }
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/jobs?page=2&sort=work_year")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    let years: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["work_year"].as_i64().unwrap())
        .collect();
    assert_eq!(years, (2010..2020).collect::<Vec<i64>>());
    assert_eq!(body["has_previous"], true);
    assert_eq!(body["has_next"], true);
}

#[actix_rt::test]
async fn test_job_title_sort_breaks_ties_by_id() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let first = seed_job(&pool, job_input(cat.titles[1], 2024, cat.us, 10_000)).await;
    let analyst = seed_job(&pool, job_input(cat.titles[2], 2024, cat.us, 20_000)).await;
    let second = seed_job(&pool, job_input(cat.titles[1], 2023, cat.us, 30_000)).await;
    let app = create_test_app(&pool).await;

    for sort in ["job_title", "-job_title"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs?sort={}", sort))
            .to_request();
        let (_, body) = call_json(&app, req).await;
        let ids: Vec<i64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|j| j["id"].as_i64().unwrap())
            .collect();
        let expected = if sort == "job_title" {
            // "Data Analyst" before "ML Engineer"
            vec![analyst.id, first.id, second.id]
        } else {
            vec![first.id, second.id, analyst.id]
        };
        assert_eq!(ids, expected.into_iter().map(i64::from).collect::<Vec<_>>(), "sort {}", sort);
    }
}

#[actix_rt::test]
async fn test_search_wildcards_match_literally() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    for needle in ["%25", "_", "Data%25Scientist"] {
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs?search={}", needle))
            .to_request();
        let (_, body) = call_json(&app, req).await;
        assert_eq!(body["total_count"], 0, "search {}", needle);
    }

    let req = test::TestRequest::get()
        .uri("/api/jobs?search=DATA%20SCI")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 1);
}
