//! Shared helpers for the end-to-end tests.

use actix_web::dev::ServiceResponse;
use actix_web::middleware::NormalizePath;
use actix_web::{App, test, web};
use rust_decimal::Decimal;
use serde_json::Value;

use job_catalog_lib::auth::AdminKey;
use job_catalog_lib::configure_app;
use job_catalog_lib::db::{DbPool, catalog};
use job_catalog_lib::models::{
    ApiKeyRole, Contract, JobRecordDetail, JobRecordInput, NewCandidate,
};
use job_catalog_lib::services::api_key;

/// Admin key configured on every test app.
pub const TEST_ADMIN_KEY: &str = "test-admin-key-for-api-e2e";

/// Fresh, migrated in-memory database.
pub async fn create_test_pool() -> DbPool {
    DbPool::in_memory()
        .await
        .expect("Failed to create in-memory database")
}

/// The application as the server builds it.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .wrap(NormalizePath::trim())
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(AdminKey::new(Some(TEST_ADMIN_KEY.to_string()))))
            .configure(configure_app),
    )
    .await
}

/// Issue an API key directly through the service layer.
pub async fn issue_key(pool: &DbPool, role: ApiKeyRole) -> String {
    let (full_key, _) = api_key::create_key(pool, "e2e", role, None)
        .await
        .expect("Failed to create API key");
    full_key
}

/// Catalog rows most job records point at.
pub struct Catalog {
    pub titles: Vec<i32>,
    pub us: i32,
    pub de: i32,
    pub candidate: i32,
}

pub async fn seed_catalog(pool: &DbPool) -> Catalog {
    let conn = pool.connection();
    let mut titles = Vec::new();
    for name in ["Data Scientist", "ML Engineer", "Data Analyst"] {
        titles.push(catalog::insert_job_title(conn, name).await.unwrap().id);
    }
    let us = catalog::insert_location(conn, "US").await.unwrap().id;
    let de = catalog::insert_location(conn, "DE").await.unwrap().id;
    for (code, description) in [
        ("SE", "Senior"),
        ("MI", "Mid-level"),
        ("FT", "Full-time"),
        ("PT", "Part-time"),
    ] {
        catalog::insert_contract(
            conn,
            &Contract {
                type_code: code.to_string(),
                description: description.to_string(),
            },
        )
        .await
        .unwrap();
    }
    let candidate = catalog::insert_candidate(
        conn,
        &NewCandidate {
            name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            location: "London".to_string(),
        },
    )
    .await
    .unwrap()
    .id;

    Catalog {
        titles,
        us,
        de,
        candidate,
    }
}

/// Job record payload with sensible defaults.
pub fn job_input(title: i32, year: i32, location: i32, salary_in_usd: i64) -> JobRecordInput {
    JobRecordInput {
        work_year: year,
        experience_level: "SE".to_string(),
        employment_type: "FT".to_string(),
        job_title: title,
        salary: Decimal::from(salary_in_usd),
        salary_currency: "USD".to_string(),
        salary_in_usd: Decimal::from(salary_in_usd),
        employee_residence: location,
        remote_ratio: 0,
        company_location: location,
        company_size: "M".to_string(),
        skills: vec![],
        industry: None,
        candidate: None,
    }
}

/// Same payload as JSON for the REST API.
pub fn job_json(title: i32, year: i32, location: i32, salary_in_usd: &str) -> Value {
    serde_json::json!({
        "work_year": year,
        "experience_level": "SE",
        "employment_type": "FT",
        "job_title": title,
        "salary": salary_in_usd,
        "salary_currency": "USD",
        "salary_in_usd": salary_in_usd,
        "employee_residence": location,
        "remote_ratio": 0,
        "company_location": location,
        "company_size": "M"
    })
}

pub async fn seed_job(pool: &DbPool, input: JobRecordInput) -> JobRecordDetail {
    let new = input.validate().expect("Invalid seed job record");
    pool.create_job_record(&new)
        .await
        .expect("Failed to seed job record")
}

/// Send a request and return the status with the JSON body (`Null` when empty).
pub async fn call_json<S>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let bytes = test::read_body(resp).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}

/// Send a request and return the status with the `Location` header.
pub async fn call_redirect<S>(app: &S, req: actix_http::Request) -> (u16, Option<String>)
where
    S: actix_web::dev::Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req).await;
    let location = resp
        .headers()
        .get(actix_web::http::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    (resp.status().as_u16(), location)
}
