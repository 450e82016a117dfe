//! Feedback REST scenarios and rating aggregates.

use actix_web::test;
use serde_json::json;

use super::test_helpers::*;

#[actix_rt::test]
async fn test_rating_out_of_range_is_rejected() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 90_000)).await;
    let app = create_test_app(&pool).await;

    for rating in [0, 6] {
        let req = test::TestRequest::post()
            .uri("/api/feedbacks")
            .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
            .set_json(json!({
                "job": job.id,
                "author": cat.candidate,
                "comment": "Interesting work",
                "rating": rating
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 400, "rating {} accepted", rating);
        assert_eq!(body["fields"]["rating"][0], "Rating must be between 1 and 5.");
    }

    let req = test::TestRequest::get().uri("/api/feedbacks").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 0);
}

#[actix_rt::test]
async fn test_unknown_job_is_field_error() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/feedbacks")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({
            "job": 4242,
            "author": cat.candidate,
            "comment": "Never existed",
            "rating": 3
        }))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 400);
    assert!(body["fields"]["job"].is_array());
}

#[actix_rt::test]
async fn test_min_rating_filter_and_average() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 90_000)).await;
    let app = create_test_app(&pool).await;

    // No feedback yet: average is null, not zero
    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}/average-rating", job.id))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(body["average_rating"].is_null());
    assert_eq!(body["feedback_count"], 0);

    for (rating, comment) in [(2, "Long hours"), (4, "Good team"), (5, "Great mentoring")] {
        let req = test::TestRequest::post()
            .uri("/api/feedbacks")
            .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
            .set_json(json!({
                "job": job.id,
                "author": cat.candidate,
                "comment": comment,
                "rating": rating
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 201, "create failed: {}", body);
    }

    let req = test::TestRequest::get()
        .uri("/api/feedbacks?min_rating=4&sort=rating")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 2);
    assert_eq!(body["items"][0]["rating"], 4);

    // Non-numeric filter is ignored
    let req = test::TestRequest::get()
        .uri("/api/feedbacks?min_rating=high")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 3);

    let req = test::TestRequest::get()
        .uri(&format!("/api/jobs/{}/average-rating?min_rating=4", job.id))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["feedback_count"], 2);

    let req = test::TestRequest::get()
        .uri("/api/feedbacks?search=TEAM")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["items"][0]["comment"], "Good team");
}

#[actix_rt::test]
async fn test_update_keeps_created_at() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 90_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/api/feedbacks")
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({
            "job": job.id,
            "author": cat.candidate,
            "comment": "Fine",
            "rating": 3
        }))
        .to_request();
    let (_, created) = call_json(&app, req).await;
    let req = test::TestRequest::get()
        .uri(&format!("/api/feedbacks/{}", created["id"]))
        .to_request();
    let (_, stored) = call_json(&app, req).await;

    let req = test::TestRequest::patch()
        .uri(&format!("/api/feedbacks/{}", created["id"]))
        .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
        .set_json(json!({ "rating": 5 }))
        .to_request();
    let (status, updated) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(updated["rating"], 5);
    assert_eq!(updated["comment"], "Fine");
    assert_eq!(updated["created_at"], stored["created_at"]);
}

#[actix_rt::test]
async fn test_rating_sort_keeps_ties_in_id_order() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 90_000)).await;
    let app = create_test_app(&pool).await;

    let mut ids = Vec::new();
    for (comment, rating) in [("a", 4), ("b", 5), ("c", 4)] {
        let req = test::TestRequest::post()
            .uri("/api/feedbacks")
            .insert_header(("X-Admin-Key", TEST_ADMIN_KEY))
            .set_json(json!({
                "job": job.id,
                "author": cat.candidate,
                "comment": comment,
                "rating": rating
            }))
            .to_request();
        let (status, body) = call_json(&app, req).await;
        assert_eq!(status, 201, "create failed: {}", body);
        ids.push(body["id"].as_i64().unwrap());
    }

    let req = test::TestRequest::get()
        .uri("/api/feedbacks?ordering=-rating")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    let listed: Vec<i64> = body["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![ids[1], ids[0], ids[2]]);

    let req = test::TestRequest::get()
        .uri("/api/feedbacks?min_rating=5&page=4")
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["current_page"], 1);
    assert_eq!(body["items"][0]["id"], ids[1]);
}
