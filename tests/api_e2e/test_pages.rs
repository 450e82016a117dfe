//! Server-rendered page routes: template contexts, form posts, redirects.

use actix_web::test;

use job_catalog_lib::db::feedbacks;
use job_catalog_lib::models::FeedbackInput;

use super::test_helpers::*;

fn job_form(title: i32, year: &str, location: i32) -> Vec<(&'static str, String)> {
    vec![
        ("work_year", year.to_string()),
        ("experience_level", "SE".to_string()),
        ("employment_type", "FT".to_string()),
        ("job_title", title.to_string()),
        ("salary", "85000".to_string()),
        ("salary_currency", "EUR".to_string()),
        ("salary_in_usd", "92000.50".to_string()),
        ("employee_residence", location.to_string()),
        ("remote_ratio", "50".to_string()),
        ("company_location", location.to_string()),
        ("company_size", "L".to_string()),
    ]
}

#[actix_rt::test]
async fn test_job_list_page_context() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    seed_job(&pool, job_input(cat.titles[2], 2024, cat.us, 60_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/jobs?search=scientist")
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "jobs/job_list.html");
    assert_eq!(body["context"]["search_query"], "scientist");
    assert_eq!(body["context"]["sort_by"], "-salary_in_usd");
    assert_eq!(body["context"]["jobs"]["total_count"], 1);

    // Page listings search the title only
    let req = test::TestRequest::get().uri("/jobs?search=us").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["context"]["jobs"]["total_count"], 0);
}

#[actix_rt::test]
async fn test_job_create_form_flow() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/jobs/create").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "jobs/job_form.html");
    assert_eq!(body["context"]["choices"]["job_titles"].as_array().unwrap().len(), 3);

    let req = test::TestRequest::post()
        .uri("/jobs/create")
        .set_form(job_form(cat.titles[1], "2024", cat.de))
        .to_request();
    let (status, location) = call_redirect(&app, req).await;
    assert_eq!(status, 303);
    let location = location.unwrap();
    assert!(location.starts_with("/jobs/"), "unexpected target {}", location);

    let req = test::TestRequest::get().uri(&location).to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "jobs/job_detail.html");
    assert_eq!(body["context"]["job"]["salary_currency"], "EUR");

    // Same triple again: the form comes back with a non-field error
    let req = test::TestRequest::post()
        .uri("/jobs/create")
        .set_form(job_form(cat.titles[1], "2024", cat.de))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert!(body["context"]["errors"]["__all__"].is_array());
    assert_eq!(body["context"]["form"]["work_year"], "2024");
}

#[actix_rt::test]
async fn test_invalid_job_form_rerenders() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/jobs/create")
        .set_form(job_form(cat.titles[0], "next year", cat.us))
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "jobs/job_form.html");
    assert!(body["context"]["errors"]["work_year"].is_array());
    assert_eq!(body["context"]["form"]["work_year"], "next year");
}

#[actix_rt::test]
async fn test_job_delete_page() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri(&format!("/jobs/{}/delete", job.id))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["template"], "jobs/job_confirm_delete.html");

    let req = test::TestRequest::post()
        .uri(&format!("/jobs/{}/delete", job.id))
        .to_request();
    let (status, location) = call_redirect(&app, req).await;
    assert_eq!(status, 303);
    assert_eq!(location.as_deref(), Some("/jobs"));

    let req = test::TestRequest::get()
        .uri(&format!("/jobs/{}", job.id))
        .to_request();
    let (status, _) = call_json(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_legacy_job_routes_redirect_to_title() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    for year in 2018..2024 {
        seed_job(&pool, job_input(cat.titles[0], year, cat.us, 90_000)).await;
    }
    let job = seed_job(&pool, job_input(cat.titles[2], 2024, cat.us, 70_000)).await;
    assert_eq!(job.id, 7);
    let title = cat.titles[2];
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get()
        .uri("/feedback/job/7?min_rating=4")
        .to_request();
    let (status, location) = call_redirect(&app, req).await;
    assert_eq!(status, 302);
    assert_eq!(
        location.as_deref(),
        Some(format!("/feedback/job-title/{}?min_rating=4", title).as_str())
    );

    let req = test::TestRequest::get()
        .uri("/feedback/job/7/average")
        .to_request();
    let (status, location) = call_redirect(&app, req).await;
    assert_eq!(status, 302);
    assert_eq!(
        location.as_deref(),
        Some(format!("/feedback/job-title/{}/average", title).as_str())
    );

    let req = test::TestRequest::get().uri("/feedback/job/99").to_request();
    let (status, _) = call_redirect(&app, req).await;
    assert_eq!(status, 404);
}

#[actix_rt::test]
async fn test_title_grouped_feedback_flow() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let title = cat.titles[1];
    let first = seed_job(&pool, job_input(title, 2023, cat.us, 100_000)).await;
    let second = seed_job(&pool, job_input(title, 2024, cat.de, 110_000)).await;
    for (job, rating) in [(first.id, 2), (second.id, 5)] {
        let new = FeedbackInput {
            job,
            author: cat.candidate,
            comment: format!("Rated {}", rating),
            rating,
        }
        .validate()
        .unwrap();
        feedbacks::insert(pool.connection(), &new).await.unwrap();
    }
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/feedback").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["template"], "feedback/select_job.html");
    let titles = body["context"]["job_titles"].as_array().unwrap();
    assert_eq!(titles.len(), 1);
    assert_eq!(titles[0]["job_count"], 2);

    let req = test::TestRequest::get()
        .uri(&format!("/feedback/job-title/{}", title))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["context"]["jobs"].as_array().unwrap().len(), 2);
    assert_eq!(body["context"]["feedbacks"].as_array().unwrap().len(), 2);
    assert_eq!(body["context"]["average_rating"], 3.5);

    let req = test::TestRequest::get()
        .uri(&format!("/feedback/job-title/{}?min_rating=3", title))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["context"]["feedbacks"].as_array().unwrap().len(), 1);
    assert_eq!(body["context"]["min_rating"], "3");
    assert_eq!(body["context"]["average_rating"], 5.0);

    let req = test::TestRequest::get()
        .uri(&format!("/feedback/job-title/{}/average", title))
        .to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["template"], "feedback/job_average_rating.html");
    assert_eq!(body["context"]["average_rating"], 3.5);
    assert_eq!(body["context"]["feedback_count"], 2);

    // Adding feedback lands on the title view of the job's title
    let req = test::TestRequest::post()
        .uri("/feedback/add")
        .set_form([
            ("job", first.id.to_string()),
            ("author", cat.candidate.to_string()),
            ("comment", "Flexible hours".to_string()),
            ("rating", "4".to_string()),
        ])
        .to_request();
    let (status, location) = call_redirect(&app, req).await;
    assert_eq!(status, 303);
    assert_eq!(
        location.as_deref(),
        Some(format!("/feedback/job-title/{}", title).as_str())
    );
}

#[actix_rt::test]
async fn test_feedback_form_rejects_bad_rating() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    let job = seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::post()
        .uri("/feedbacks/create")
        .set_form([
            ("job", job.id.to_string()),
            ("author", cat.candidate.to_string()),
            ("comment", "Too good".to_string()),
            ("rating", "7".to_string()),
        ])
        .to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "feedbacks/feedback_form.html");
    assert_eq!(
        body["context"]["errors"]["rating"][0],
        "Rating must be between 1 and 5."
    );

    let req = test::TestRequest::get().uri("/feedbacks").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["context"]["feedbacks"]["total_count"], 0);
}

#[actix_rt::test]
async fn test_dashboard_page() {
    let pool = create_test_pool().await;
    let cat = seed_catalog(&pool).await;
    seed_job(&pool, job_input(cat.titles[0], 2024, cat.us, 100_000)).await;
    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/dashboard/").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["template"], "dashboard.html");
    assert_eq!(body["context"]["stats"][0]["job_title"], "Data Scientist");
    assert_eq!(body["context"]["stats"][0]["avg_rating"], 0.0);
    assert_eq!(body["context"]["remote"]["total_count"], 1);
}
