//! Job record pages.

use actix_web::{HttpResponse, get, post, web};
use serde::Serialize;
use tracing::info;

use super::{FormContext, JobChoices, form_errors, render, see_other};
use crate::db::{DbPool, job_records};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{JobForm, JobRecordDetail};
use crate::services::listing::{self, ListingPage, ListingParams, ListingQuery};

const FORM_TEMPLATE: &str = "jobs/job_form.html";

/// `/jobs/create` is registered ahead of `/jobs/{id}`.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(job_list)
        .service(job_create_form)
        .service(job_create)
        .service(job_detail)
        .service(job_update_form)
        .service(job_update)
        .service(job_delete_confirm)
        .service(job_delete);
}

#[derive(Serialize)]
struct ListContext {
    jobs: ListingPage<JobRecordDetail>,
    search_query: String,
    sort_by: String,
}

#[derive(Serialize)]
struct JobContext {
    job: JobRecordDetail,
}

async fn load(pool: &DbPool, id: i32) -> AppResult<JobRecordDetail> {
    job_records::find_detail(pool.connection(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job record {}", id)))
}

async fn render_form(
    pool: &DbPool,
    form: JobForm,
    errors: FieldErrors,
    object_id: Option<i32>,
) -> AppResult<HttpResponse> {
    let choices = JobChoices::load(pool).await?;
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

/// Validate the form and write it; `id` selects update over create.
async fn save(pool: &DbPool, form: &JobForm, id: Option<i32>) -> AppResult<JobRecordDetail> {
    let new = form.parse()?.validate()?;
    match id {
        Some(id) => pool.update_job_record(id, &new).await,
        None => pool.create_job_record(&new).await,
    }
}

#[get("/jobs")]
pub async fn job_list(
    query: web::Query<ListingParams>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let query = ListingQuery::resolve(&query, &listing::JOB_PAGES);
    let jobs = job_records::list_page(pool.connection(), &listing::JOB_PAGES, &query).await?;
    render(
        "jobs/job_list.html",
        ListContext {
            search_query: jobs.search.clone(),
            sort_by: jobs.sort.clone(),
            jobs,
        },
    )
}

#[get("/jobs/create")]
pub async fn job_create_form(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    render_form(pool.get_ref(), JobForm::default(), FieldErrors::new(), None).await
}

#[post("/jobs/create")]
pub async fn job_create(
    form: web::Form<JobForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    match save(pool.get_ref(), &form, None).await {
        Ok(job) => {
            info!(job_record_id = job.id, "Job record created from page");
            Ok(see_other(format!("/jobs/{}", job.id)))
        }
        Err(err) => render_form(pool.get_ref(), form, form_errors(err)?, None).await,
    }
}

#[get("/jobs/{id}")]
pub async fn job_detail(path: web::Path<i32>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let job = load(pool.get_ref(), path.into_inner()).await?;
    render("jobs/job_detail.html", JobContext { job })
}

#[get("/jobs/{id}/update")]
pub async fn job_update_form(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let job = load(pool.get_ref(), path.into_inner()).await?;
    let form = JobForm::from_input(&job.to_input());
    render_form(pool.get_ref(), form, FieldErrors::new(), Some(job.id)).await
}

#[post("/jobs/{id}/update")]
pub async fn job_update(
    path: web::Path<i32>,
    form: web::Form<JobForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    load(pool.get_ref(), id).await?;
    let form = form.into_inner();
    match save(pool.get_ref(), &form, Some(id)).await {
        Ok(job) => {
            info!(job_record_id = job.id, "Job record updated from page");
            Ok(see_other(format!("/jobs/{}", job.id)))
        }
        Err(err) => render_form(pool.get_ref(), form, form_errors(err)?, Some(id)).await,
    }
}

#[get("/jobs/{id}/delete")]
pub async fn job_delete_confirm(
    path: web::Path<i32>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let job = load(pool.get_ref(), path.into_inner()).await?;
    render("jobs/job_confirm_delete.html", JobContext { job })
}

#[post("/jobs/{id}/delete")]
pub async fn job_delete(path: web::Path<i32>, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let id = path.into_inner();
    if !pool.delete_job_record(id).await? {
        return Err(AppError::NotFound(format!("Job record {}", id)));
    }
    info!(job_record_id = id, "Job record deleted from page");
    Ok(see_other("/jobs"))
}
