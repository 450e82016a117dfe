//! Feedback API handlers.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use tracing::info;

use crate::auth::ApiKeyAuth;
use crate::db::{DbPool, feedbacks};
use crate::error::{AppError, AppResult};
use crate::models::{Feedback, FeedbackInput, FeedbackPatch};
use crate::services::listing::{self, ListingPage, ListingParams, ListingQuery};

/// Configure feedback routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(list_feedbacks)
        .service(create_feedback)
        .service(get_feedback)
        .service(update_feedback)
        .service(patch_feedback)
        .service(delete_feedback);
}

async fn load(pool: &DbPool, id: i32) -> AppResult<Feedback> {
    feedbacks::find_by_id(pool.connection(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {}", id)))
}

/// List feedback.
///
/// Searches the comment; sorts by created_at or rating; `min_rating` keeps
/// ratings at or above the given value.
#[utoipa::path(
    get,
    path = "/api/feedbacks",
    tag = "Feedback",
    params(ListingParams),
    responses(
        (status = 200, description = "One page of feedback", body = ListingPage<Feedback>)
    )
)]
#[get("/feedbacks")]
pub async fn list_feedbacks(
    query: web::Query<ListingParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let query = ListingQuery::resolve(&query, &listing::FEEDBACK);
    let page = feedbacks::list_page(pool.connection(), &listing::FEEDBACK, &query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// Create feedback.
#[utoipa::path(
    post,
    path = "/api/feedbacks",
    tag = "Feedback",
    request_body = FeedbackInput,
    responses(
        (status = 201, description = "Feedback created", body = Feedback),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 401, description = "Unauthorized", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[post("/feedbacks")]
pub async fn create_feedback(
    auth: ApiKeyAuth,
    body: web::Json<FeedbackInput>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let new = body.validate()?;
    let feedback = feedbacks::insert(pool.connection(), &new).await?;
    info!(feedback_id = feedback.id, job_record_id = feedback.job, "Feedback created");
    Ok(HttpResponse::Created().json(feedback))
}

/// Get feedback.
#[utoipa::path(
    get,
    path = "/api/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "Feedback id")),
    responses(
        (status = 200, description = "Feedback", body = Feedback),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    )
)]
#[get("/feedbacks/{id}")]
pub async fn get_feedback(path: web::Path<i32>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let feedback = load(pool.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(feedback))
}

/// Replace feedback. `created_at` is kept.
#[utoipa::path(
    put,
    path = "/api/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "Feedback id")),
    request_body = FeedbackInput,
    responses(
        (status = 200, description = "Feedback updated", body = Feedback),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[put("/feedbacks/{id}")]
pub async fn update_feedback(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    body: web::Json<FeedbackInput>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    load(pool.get_ref(), id).await?;
    let new = body.validate()?;
    let feedback = feedbacks::update(pool.connection(), id, &new).await?;
    info!(feedback_id = id, "Feedback updated");
    Ok(HttpResponse::Ok().json(feedback))
}

/// Change some fields of feedback.
#[utoipa::path(
    patch,
    path = "/api/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "Feedback id")),
    request_body = FeedbackPatch,
    responses(
        (status = 200, description = "Feedback updated", body = Feedback),
        (status = 400, description = "Validation failed", body = crate::error::ErrorResponse),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[patch("/feedbacks/{id}")]
pub async fn patch_feedback(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    body: web::Json<FeedbackPatch>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    let current = load(pool.get_ref(), id).await?;
    let new = body.into_inner().apply(&current).validate()?;
    let feedback = feedbacks::update(pool.connection(), id, &new).await?;
    info!(feedback_id = id, "Feedback patched");
    Ok(HttpResponse::Ok().json(feedback))
}

/// Delete feedback.
#[utoipa::path(
    delete,
    path = "/api/feedbacks/{id}",
    tag = "Feedback",
    params(("id" = i32, Path, description = "Feedback id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorResponse)
    ),
    security(("api_key" = []))
)]
#[delete("/feedbacks/{id}")]
pub async fn delete_feedback(
    auth: ApiKeyAuth,
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    auth.require_write()?;
    let id = path.into_inner();
    if !feedbacks::delete(pool.connection(), id).await? {
        return Err(AppError::NotFound(format!("Feedback {}", id)));
    }
    info!(feedback_id = id, "Feedback deleted");
    Ok(HttpResponse::NoContent().finish())
}
