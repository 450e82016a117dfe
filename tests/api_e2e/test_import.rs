//! CSV import feeding the REST API.

use actix_web::test;

use job_catalog_lib::services::import_jobs;

use super::test_helpers::*;

const CSV: &str = "\
work_year,experience_level,employment_type,job_title,salary,salary_currency,salary_in_usd,employee_residence,remote_ratio,company_location,company_size
2024,SE,FT,Data Engineer,120000,USD,120000,US,100,US,M
2024,MI,FT,Data Engineer,90000,EUR,97000,DE,0,US,L
2023,EN,PT,Analyst,40000,GBP,50000,GB,50,GB,S
";

#[actix_rt::test]
async fn test_imported_rows_are_served() {
    let pool = create_test_pool().await;
    let summary = import_jobs(&pool, CSV.as_bytes()).await.unwrap();
    assert_eq!(summary.job_records_created, 2);
    assert_eq!(summary.duplicates_skipped, 1);

    let app = create_test_app(&pool).await;

    let req = test::TestRequest::get().uri("/api/jobs").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body["total_count"], 2);
    // The first row of a duplicate pair wins
    assert_eq!(body["items"][0]["job_title_name"], "Data Engineer");
    assert_eq!(body["items"][0]["experience_level"], "SE");

    let req = test::TestRequest::get().uri("/api/contract/EN").to_request();
    let (status, body) = call_json(&app, req).await;
    assert_eq!(status, 200);
    assert_eq!(body["description"], "Experience Level: EN");

    let req = test::TestRequest::get().uri("/api/location").to_request();
    let (_, body) = call_json(&app, req).await;
    assert_eq!(body.as_array().unwrap().len(), 3);

    // Importing the same file again only finds duplicates
    let again = import_jobs(&pool, CSV.as_bytes()).await.unwrap();
    assert_eq!(again.job_records_created, 0);
    assert_eq!(again.duplicates_skipped, 3);
    assert_eq!(again.job_titles_created, 0);
}
