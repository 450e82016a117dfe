//! Statistics endpoints over seeded job records.

use actix_web::test;

use job_catalog_lib::db::feedbacks;
use job_catalog_lib::models::FeedbackInput;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_empty_catalog_statistics() {
    let pool = create_test_pool().await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/stats/remote-ratio").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["percentage"], 0.0);

    let req = test::TestRequest::get().uri("/api/stats/top-salaries").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body, serde_json::json!([]));
}

#[actix_rt::test]
async fn test_salary_statistics() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[0], 2023, cat.us, 100_000)).await;
    seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 200_000)).await;
    let mut remote = job_input(cat.titles[1], 2024, cat.de, 120_000);
    remote.remote_ratio = 100;
    remote.experience_level = "MI".to_string();
    seed_job(&pool, remote).await;
    seed_job(&pool, job_input(cat.titles[2], 2024, cat.us, 60_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/api/stats/top-salaries?n=2")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["job_title"], "Data Scientist");
    assert_eq!(rows[1]["job_title"], "ML Engineer");

    let req = test::TestRequest::get()
        .uri("/api/stats/salary-by-experience")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body[0]["type_code"], "MI");
    assert_eq!(body[0]["description"], "Mid-level");
    assert_eq!(body[1]["type_code"], "SE");

    let req = test::TestRequest::get()
        .uri("/api/stats/jobs-by-location")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body[0]["country_code"], "US");
    assert_eq!(body[0]["job_count"], 3);
    assert_eq!(body[1]["country_code"], "DE");

    let req = test::TestRequest::get().uri("/api/stats/remote-ratio").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["remote_count"], 1);
    assert_eq!(body["total_count"], 4);
    assert_eq!(body["percentage"], 25.0);
}

#[actix_rt::test]
async fn test_dashboard_zero_versus_null_average() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[1], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/stats/dashboard").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body[0]["job_title"], "ML Engineer");
    assert_eq!(body[0]["avg_rating"], 0.0);
    assert_eq!(body[0]["feedback_count"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/api/job-title/{}/average-rating", cat.titles[1]))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(body["average_rating"].is_null());

    let req = test::TestRequest::get()
        .uri("/api/job-title/999/average-rating")
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_ratios_and_averages_are_exact() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let mut remote = job_input(cat.titles[0], 2024, cat.us, 100_000);
    remote.remote_ratio = 100;
    let job = seed_job(&pool, remote).await;
    seed_job(&pool, job_input(cat.titles[0], 2023, cat.us, 100_000)).await;
    seed_job(&pool, job_input(cat.titles[0], 2022, cat.us, 100_000)).await;
    for rating in [4, 4, 5] {
        let new = FeedbackInput {
            job: job.id,
            author: cat.candidate,
            comment: "ok".to_string(),
            rating,
        }
        .validate()
        .unwrap();
        feedbacks::insert(pool.connection(), &new).await.unwrap();
    }
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/stats/remote-ratio").to_request();
    let (_, body) = call_json(&app, req).await;
    let percentage = body["percentage"].as_f64().unwrap();
    assert!((percentage - 100.0 / 3.0).abs() < 1e-9, "percentage {}", percentage);

    let req = test::TestRequest::get().uri("/api/stats/dashboard").to_request();
    let (_, body) = call_json(&app, req).await;
    let avg = body[0]["avg_rating"].as_f64().unwrap();
    assert!((avg - 13.0 / 3.0).abs() < 1e-9, "avg_rating {}", avg);
    assert_eq!(body[0]["feedback_count"], 3);
}
