//! Feedback CRUD pages.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::info;

use super::{FeedbackChoices, FormContext, form_errors, render, see_other};
use crate::db::{DbPool, feedbacks};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{Feedback, FeedbackForm, FeedbackPatch};
use crate::services::listing::{self, ListingPage, ListingParams, ListingQuery};

const FORM_TEMPLATE: &str = "feedbacks/feedback_form.html";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(feedback_list)
        .service(feedback_create_form)
        .service(feedback_create)
        .service(feedback_detail)
        .service(feedback_update_form)
        .service(feedback_update)
        .service(feedback_delete_confirm)
        .service(feedback_delete);
}

#[derive(Serialize)]
struct ListContext {
    feedbacks: ListingPage<Feedback>,
    search_query: String,
    sort_by: String,
}

#[derive(Serialize)]
struct FeedbackContext {
    feedback: Feedback,
}

async fn load(pool: &DbPool, id: i32) -> AppResult<Feedback> {
    feedbacks::find_by_id(pool.connection(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Feedback {}", id)))
}

async fn render_form(
    pool: &DbPool,
    form: FeedbackForm,
    errors: FieldErrors,
    object_id: Option<i32>,
) -> AppResult<HttpResponse> {
    let choices = FeedbackChoices::load(pool).await?;
    render(
        FORM_TEMPLATE,
        FormContext {
            form,
            errors,
            choices,
            object_id,
        },
    )
}

async fn save(pool: &DbPool, form: &FeedbackForm, id: Option<i32>) -> AppResult<Feedback> {
    let new = form.parse()?.validate()?;
    match id {
        Some(id) => feedbacks::update(pool.connection(), id, &new).await,
        None => feedbacks::insert(pool.connection(), &new).await,
    }
}

#[get("/feedbacks")]
pub async fn feedback_list(
    query: web::Query<ListingParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let query = ListingQuery::resolve(&query, &listing::FEEDBACK);
    let page = feedbacks::list_page(pool.connection(), &listing::FEEDBACK, &query).await?;
    render(
        "feedbacks/feedback_list.html",
        ListContext {
            search_query: page.search.clone(),
            sort_by: page.sort.clone(),
            feedbacks: page,
        },
    )
}

#[get("/feedbacks/create")]
pub async fn feedback_create_form(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    render_form(pool.get_ref(), FeedbackForm::default(), FieldErrors::new(), None).await
}

#[post("/feedbacks/create")]
pub async fn feedback_create(
    form: web::Form<FeedbackForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    match save(pool.get_ref(), &form, None).await {
        Ok(feedback) => {
            info!(feedback_id = feedback.id, "Feedback created from page");
            Ok(see_other(format!("/feedbacks/{}", feedback.id)))
        }
        Err(err) => render_form(pool.get_ref(), form, form_errors(err)?, None).await,
    }
}

#[get("/feedbacks/{id}")]
pub async fn feedback_detail(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let feedback = load(pool.get_ref(), path.into_inner()).await?;
    render("feedbacks/feedback_detail.html", FeedbackContext { feedback })
}

#[get("/feedbacks/{id}/update")]
pub async fn feedback_update_form(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let feedback = load(pool.get_ref(), path.into_inner()).await?;
    let form = FeedbackForm::from_input(&FeedbackPatch::default().apply(&feedback));
    render_form(pool.get_ref(), form, FieldErrors::new(), Some(feedback.id)).await
}

#[post("/feedbacks/{id}/update")]
pub async fn feedback_update(
    path: web::Path<i32>,
    form: web::Form<FeedbackForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    load(pool.get_ref(), id).await?;
    let form = form.into_inner();
    match save(pool.get_ref(), &form, Some(id)).await {
        Ok(feedback) => {
            info!(feedback_id = id, "Feedback updated from page");
            Ok(see_other(format!("/feedbacks/{}", feedback.id)))
        }
        Err(err) => render_form(pool.get_ref(), form, form_errors(err)?, Some(id)).await,
    }
}

#[get("/feedbacks/{id}/delete")]
pub async fn feedback_delete_confirm(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let feedback = load(pool.get_ref(), path.into_inner()).await?;
    render("feedbacks/feedback_confirm_delete.html", FeedbackContext { feedback })
}

#[post("/feedbacks/{id}/delete")]
pub async fn feedback_delete(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !feedbacks::delete(pool.connection(), id).await? {
        return Err(AppError::NotFound(format!("Feedback {}", id)));
    }
    info!(feedback_id = id, "Feedback deleted from page");
    Ok(see_other("/feedbacks"))
}
