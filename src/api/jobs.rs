//! Job record API handlers.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::{DbPool, job_records};
use crate::error::{AppError, AppResult};
use crate::models::{JobRecordDetail, JobRecordInput, JobRecordPatch};
use crate::services::listing::{self, ListingPage, ListingParams, ListingQuery};

/// Configure job record routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_jobs)
        .service(create_job)
        .service(get_job)
        .service(update_job)
        .service(patch_job)
        .service(delete_job);
}

async fn load(pool: &DbPool, id: i32) -> AppResult<JobRecordDetail> {
    job_records::find_detail(pool.connection(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job record {}", id)))
}

/// List job records.
///
/// Searches job title and employee residence; sorts by salary_in_usd,
/// created_at, work_year, remote_ratio or job_title.
#[utoipa::path(
    get,
    path = "/api/jobs",
    tag = "Jobs",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of job records", body = ListingPage<JobRecordDetail>)
    )
)]
#[get("/jobs")]
pub async fn list_jobs(
    query: web::Query<ListingParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let query = ListingQuery::resolve(&query, &listing::JOB_API);
    let page = job_records::list_page(pool.connection(), &listing::JOB_API, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Create a job record.
#[utoipa::path(
    post,
    path = "/api/jobs",
    tag = "Jobs",
    request_body = JobRecordInput,
    responses(
        (status = 201, description = "Job record created", body = JobRecordDetail),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate job title, work year and company location", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[post("/jobs")]
pub async fn create_job(
    auth: ApiKeyAuth,
    body: web::Json<JobRecordInput>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let new = body.validate()?;
    let job = pool.create_job_record(&new).await?;
    info!(job_record_id = job.id, caller = %auth.caller.key_prefix, "Job record created");
    Ok(HttpResponse::Created().json(job))
}

/// Get a job record.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = i32, Path, description = "Job record id")),
    responses(
        (status = 200, description = "Job record", body = JobRecordDetail),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/jobs/{id}")]
pub async fn get_job(path: web::Path<i32>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let job = load(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(job))
}

/// Replace a job record.
#[utoipa::path(
    put,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = i32, Path, description = "Job record id")),
    request_body = JobRecordInput,
    responses(
        (status = 200, description = "Job record updated", body = JobRecordDetail),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate job title, work year and company location", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[put("/jobs/{id}")]
pub async fn update_job(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    body: web::Json<JobRecordInput>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    load(pool.get_ref(), id).await?;
    let new = body.validate()?;
    let job = pool.update_job_record(id, &new).await?;
    info!(job_record_id = id, "Job record updated");
    Ok(HttpResponse::Ok().json(job))
}

/// Change some fields of a job record.
#[utoipa::path(
    patch,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = i32, Path, description = "Job record id")),
    request_body = JobRecordPatch,
    responses(
        (status = 200, description = "Job record updated", body = JobRecordDetail),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Duplicate job title, work year and company location", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[patch("/jobs/{id}")]
pub async fn patch_job(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    body: web::Json<JobRecordPatch>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    let current = load(pool.get_ref(), id).await?;
    let new = body.into_inner().apply(current.to_input()).validate()?;
    let job = pool.update_job_record(id, &new).await?;
    info!(job_record_id = id, "Job record patched");
    Ok(HttpResponse::Ok().json(job))
}

/// Delete a job record and its feedback.
#[utoipa::path(
    delete,
    path = "/api/jobs/{id}",
    tag = "Jobs",
    params(("id" = i32, Path, description = "Job record id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[delete("/jobs/{id}")]
pub async fn delete_job(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    if !pool.delete_job_record(id).await? {
        return Err(AppError::NotFound(format!("Job record {}", id)));
    }
    info!(job_record_id = id, "Job record deleted");
    Ok(HttpResponse::NoContent().finish())
}
