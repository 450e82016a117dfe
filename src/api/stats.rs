//! Read-only aggregation endpoints.

use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{
    AverageRating, DashboardRow, ExperienceSalary, LocationCount, RemoteSummary, TitleSalary,
};
use crate::services::listing::parse_min_rating;
use crate::services::stats;

const DEFAULT_TOP_N: usize = 5;

/// Configure statistics routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(top_salaries)
        .service(salary_by_experience)
        .service(jobs_by_location)
        .service(remote_ratio)
        .service(dashboard)
        .service(job_average_rating)
        .service(job_title_average_rating);
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopQuery {
    /// Number of titles to return (default 5)
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RatingQuery {
    /// Only count ratings at or above this value; ignored unless all digits
    pub min_rating: Option<String>,
}

/// Job titles with the highest mean USD salary.
#[utoipa::path(
    get,
    path = "/api/stats/top-salaries",
    tag = "Statistics",
    params(TopQuery),
    responses((status = 200, description = "Mean salary per title, highest first", body = Vec<TitleSalary>))
)]
#[get("/stats/top-salaries")]
pub async fn top_salaries(
    query: web::Query<TopQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let rows = stats::top_salaries(pool.get_ref(), query.n.unwrap_or(DEFAULT_TOP_N)).await?;
    Ok(HttpResponse::Ok().json(rows))
}

#[utoipa::path(
    get,
    path = "/api/stats/salary-by-experience",
    tag = "Statistics",
    responses((status = 200, description = "Mean salary per experience level", body = Vec<ExperienceSalary>))
)]
#[get("/stats/salary-by-experience")]
pub async fn salary_by_experience(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(stats::salary_by_experience(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/jobs-by-location",
    tag = "Statistics",
    responses((status = 200, description = "Job count per company location", body = Vec<LocationCount>))
)]
#[get("/stats/jobs-by-location")]
pub async fn jobs_by_location(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(stats::jobs_by_location(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/remote-ratio",
    tag = "Statistics",
    responses((status = 200, description = "Share of fully remote jobs", body = RemoteSummary))
)]
#[get("/stats/remote-ratio")]
pub async fn remote_ratio(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(stats::remote_ratio(pool.get_ref()).await?))
}

#[utoipa::path(
    get,
    path = "/api/stats/dashboard",
    tag = "Statistics",
    responses((status = 200, description = "Feedback totals per job title", body = Vec<DashboardRow>))
)]
#[get("/stats/dashboard")]
pub async fn dashboard(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(stats::dashboard(pool.get_ref()).await?))
}

/// Average rating of one job record; `null` without feedback.
#[utoipa::path(
    get,
    path = "/api/jobs/{id}/average-rating",
    tag = "Statistics",
    params(("id" = i32, Path, description = "Job record id"), RatingQuery),
    responses(
        (status = 200, description = "Average rating", body = AverageRating),
        (status = 404, description = "Job record not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/jobs/{id}/average-rating")]
pub async fn job_average_rating(
    path: web::Path<i32>,
    query: web::Query<RatingQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let min_rating = query.min_rating.as_deref().and_then(parse_min_rating);
    let result = stats::job_average_rating(pool.get_ref(), path.into_inner(), min_rating).await?;
    Ok(HttpResponse::Ok().json(result))
}

/// Average rating over every job record of a title; `null` without feedback.
#[utoipa::path(
    get,
    path = "/api/job-title/{id}/average-rating",
    tag = "Statistics",
    params(("id" = i32, Path, description = "Job title id"), RatingQuery),
    responses(
        (status = 200, description = "Average rating", body = AverageRating),
        (status = 404, description = "Job title not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/job-title/{id}/average-rating")]
pub async fn job_title_average_rating(
    path: web::Path<i32>,
    query: web::Query<RatingQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let min_rating = query.min_rating.as_deref().and_then(parse_min_rating);
    let result =
        stats::job_title_average_rating(pool.get_ref(), path.into_inner(), min_rating).await?;
    Ok(HttpResponse::Ok().json(result))
}
