//! Feedback browsing grouped by job title.
//!
//! Select a title, see its job records with their feedback, add feedback,
//! view the average. Job-id URLs from the earlier per-job flow redirect here.

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FeedbackChoices, FormContext, form_errors, found, render, see_other};
use crate::db::{DbPool, catalog, feedbacks, job_records, stats as db_stats};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{Feedback, FeedbackForm, JobRecordDetail, JobTitle};
use crate::services::listing::parse_min_rating;
use crate::services::stats;

const ADD_TEMPLATE: &str = "feedback/add_feedback.html";

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(select_job_title)
        .service(add_feedback_form)
        .service(add_feedback)
        .service(job_title_feedbacks)
        .service(job_title_average)
        .service(legacy_job_feedbacks)
        .service(legacy_job_average);
}

#[derive(Debug, Deserialize)]
pub struct FlowQuery {
    pub min_rating: Option<String>,
}

impl FlowQuery {
    /// Query string to carry across a redirect.
    fn carry(&self) -> String {
        match &self.min_rating {
            Some(raw) => format!("?min_rating={}", urlencoding::encode(raw)),
            None => String::new(),
        }
    }
}

#[derive(Serialize)]
struct TitleEntry {
    id: i32,
    name: String,
    job_count: u64,
}

#[derive(Serialize)]
struct SelectContext {
    job_titles: Vec<TitleEntry>,
}

#[derive(Serialize)]
struct TitleFeedbackContext {
    job_title: JobTitle,
    jobs: Vec<JobRecordDetail>,
    feedbacks: Vec<Feedback>,
    /// Raw value echoed back to the filter box
    min_rating: Option<String>,
    average_rating: Option<f64>,
}

#[derive(Serialize)]
struct AverageContext {
    job_title: JobTitle,
    average_rating: Option<f64>,
    feedback_count: u64,
}

async fn load_title(pool: &DbPool, id: i32) -> AppResult<JobTitle> {
    catalog::find_job_title(pool.connection(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job title {}", id)))
}

/// Title id of a job record.
async fn title_of_job(pool: &DbPool, job_id: i32) -> AppResult<i32> {
    job_records::find_model(pool.connection(), job_id)
        .await?
        .map(|job| job.job_title_id)
        .ok_or_else(|| AppError::NotFound(format!("Job record {}", job_id)))
}

/// Titles that have job records, by name.
#[get("/feedback")]
pub async fn select_job_title(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let job_titles = db_stats::title_job_counts(pool.connection())
        .await?
        .into_iter()
        .map(|row| TitleEntry {
            id: row.id,
            name: row.name,
            job_count: u64::try_from(row.job_count).unwrap_or_default(),
        })
        .collect();
    render("feedback/select_job.html", SelectContext { job_titles })
}

#[get("/feedback/add")]
pub async fn add_feedback_form(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let choices = FeedbackChoices::load(pool.get_ref()).await?;
    render(
        ADD_TEMPLATE,
        FormContext {
            form: FeedbackForm::default(),
            errors: FieldErrors::new(),
            choices,
            object_id: None,
        },
    )
}

/// On success, go to the title view of the job's title.
#[post("/feedback/add")]
pub async fn add_feedback(
    form: web::Form<FeedbackForm>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let saved = match form.parse().and_then(|input| input.validate()) {
        Ok(new) => feedbacks::insert(pool.connection(), &new).await,
        Err(err) => Err(err),
    };
    match saved {
        Ok(feedback) => {
            let title_id = title_of_job(pool.get_ref(), feedback.job).await?;
            info!(
                feedback_id = feedback.id,
                job_title_id = title_id,
                "Feedback added"
            );
            Ok(see_other(format!("/feedback/job-title/{}", title_id)))
        }
        Err(err) => {
            let errors = form_errors(err)?;
            let choices = FeedbackChoices::load(pool.get_ref()).await?;
            render(
                ADD_TEMPLATE,
                FormContext {
                    form,
                    errors,
                    choices,
                    object_id: None,
                },
            )
        }
    }
}

/// Job records of one title and their feedback. `min_rating` filters the
/// feedback and the average when it is all digits.
#[get("/feedback/job-title/{id}")]
pub async fn job_title_feedbacks(
    path: web::Path<i32>,
    query: web::Query<FlowQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let job_title = load_title(pool.get_ref(), path.into_inner()).await?;
    let min_rating = query.min_rating.as_deref().and_then(parse_min_rating);
    let conn = pool.connection();
    let jobs = job_records::list_details_by_title(conn, job_title.id).await?;
    let feedbacks = feedbacks::list_for_job_title(conn, job_title.id, min_rating).await?;
    let summary =
        db_stats::rating_summary(conn, db_stats::RatingScope::JobTitle(job_title.id), min_rating)
            .await?;
    let average_rating = stats::average_rating(summary).average_rating;

    render(
        "feedback/list_feedback.html",
        TitleFeedbackContext {
            job_title,
            jobs,
            feedbacks,
            min_rating: query.into_inner().min_rating,
            average_rating,
        },
    )
}

#[get("/feedback/job-title/{id}/average")]
pub async fn job_title_average(
    path: web::Path<i32>,
    query: web::Query<FlowQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let job_title = load_title(pool.get_ref(), path.into_inner()).await?;
    let min_rating = query.min_rating.as_deref().and_then(parse_min_rating);
    let average = stats::job_title_average_rating(pool.get_ref(), job_title.id, min_rating).await?;
    render(
        "feedback/job_average_rating.html",
        AverageContext {
            job_title,
            average_rating: average.average_rating,
            feedback_count: average.feedback_count,
        },
    )
}

#[get("/feedback/job/{id}")]
pub async fn legacy_job_feedbacks(
    path: web::Path<i32>,
    query: web::Query<FlowQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let title_id = title_of_job(pool.get_ref(), path.into_inner()).await?;
    Ok(found(format!("/feedback/job-title/{}{}", title_id, query.carry())))
}

#[get("/feedback/job/{id}/average")]
pub async fn legacy_job_average(
    path: web::Path<i32>,
    query: web::Query<FlowQuery>,
    pool: web::Data<DbPool>,
) -> AppResult<HttpResponse> {
    let title_id = title_of_job(pool.get_ref(), path.into_inner()).await?;
    Ok(found(format!(
        "/feedback/job-title/{}/average{}",
        title_id,
        query.carry()
    )))
}
