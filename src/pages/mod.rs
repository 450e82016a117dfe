//! Server-rendered page routes.
//!
//! Templating lives outside this service: each page answers with the name of
//! its template and the fully derived context as JSON. Successful form posts
//! redirect with `303 See Other`; invalid forms re-render with field errors.

pub mod dashboard;
pub mod feedback_flow;
pub mod feedbacks;
pub mod jobs;

use actix_web::http::header;
use actix_web::{HttpResponse, web};
use serde::Serialize;

use crate::db::{DbPool, catalog, job_records};
use crate::error::{AppError, AppResult, FieldErrors};
use crate::models::{Candidate, Contract, Industry, JobTitle, Location, Skill};

/// Key for errors that belong to the whole form.
pub const NON_FIELD_ERRORS: &str = "__all__";

#[derive(Debug, Serialize)]
pub struct Page {
    pub template: &'static str,
    pub context: serde_json::Value,
}

/// 200 with the template name and context.
pub fn render(template: &'static str, context: impl Serialize) -> AppResult<HttpResponse> {
    Ok(HttpResponse::Ok().json(Page {
        template,
        context: serde_json::to_value(context)?,
    }))
}

/// 303 after a successful write.
pub fn see_other(location: impl Into<String>) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// 302 for routes that moved.
pub fn found(location: impl Into<String>) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location.into()))
        .finish()
}

/// Errors a form can show; anything else propagates.
pub fn form_errors(err: AppError) -> AppResult<FieldErrors> {
    match err {
        AppError::Validation(errors) => Ok(errors),
        AppError::Conflict(message) => {
            let mut errors = FieldErrors::new();
            errors.add(NON_FIELD_ERRORS, message);
            Ok(errors)
        }
        other => Err(other),
    }
}

/// Form page context: submitted values, errors and select options.
#[derive(Debug, Serialize)]
pub struct FormContext<F: Serialize, C: Serialize> {
    pub form: F,
    pub errors: FieldErrors,
    pub choices: C,
    /// Id of the record being edited, `None` on create pages
    pub object_id: Option<i32>,
}

/// Select options of the job record form.
#[derive(Debug, Serialize)]
pub struct JobChoices {
    pub job_titles: Vec<JobTitle>,
    pub locations: Vec<Location>,
    pub contracts: Vec<Contract>,
    pub skills: Vec<Skill>,
    pub industries: Vec<Industry>,
    pub candidates: Vec<Candidate>,
    pub currencies: Vec<Choice>,
    pub company_sizes: Vec<Choice>,
}

#[derive(Debug, Serialize)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl JobChoices {
    pub async fn load(pool: &DbPool) -> AppResult<Self> {
        use crate::models::{CompanySize, Currency};

        let conn = pool.connection();
        Ok(Self {
            job_titles: catalog::list_job_titles(conn).await?,
            locations: catalog::list_locations(conn).await?,
            contracts: catalog::list_contracts(conn).await?,
            skills: catalog::list_skills(conn).await?,
            industries: catalog::list_industries(conn).await?,
            candidates: catalog::list_candidates(conn).await?,
            currencies: [Currency::Usd, Currency::Eur, Currency::Gbp]
                .iter()
                .map(|c| Choice {
                    value: c.as_str().to_string(),
                    label: c.label().to_string(),
                })
                .collect(),
            company_sizes: [CompanySize::Small, CompanySize::Medium, CompanySize::Large]
                .iter()
                .map(|s| Choice {
                    value: s.as_str().to_string(),
                    label: s.label().to_string(),
                })
                .collect(),
        })
    }
}

/// Select options of the feedback form.
#[derive(Debug, Serialize)]
pub struct FeedbackChoices {
    pub jobs: Vec<Choice>,
    pub candidates: Vec<Candidate>,
}

impl FeedbackChoices {
    pub async fn load(pool: &DbPool) -> AppResult<Self> {
        let conn = pool.connection();
        Ok(Self {
            jobs: job_records::job_choices(conn)
                .await?
                .into_iter()
                .map(|(id, label)| Choice {
                    value: id.to_string(),
                    label,
                })
                .collect(),
            candidates: catalog::list_candidates(conn).await?,
        })
    }
}

/// Mount every page route. Literal paths come before `{id}` patterns.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    jobs::configure_routes(cfg);
    feedbacks::configure_routes(cfg);
    feedback_flow::configure_routes(cfg);
    dashboard::configure_routes(cfg);
}
