//! OpenAPI documentation configuration.

use actix_web::{HttpResponse, get, web};
use utoipa::OpenApi;

use crate::{api, error, models, services};

/// OpenAPI documentation.
///
/// Catalog resources share generic handlers and are described by their
/// schemas only.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Job Catalog Server",
        version = "0.1.0",
        description = "Job listings, salary statistics and candidate feedback"
    ),
    servers(
        (url = "/", description = "Local server")
    ),
    paths(
        // Health endpoints
        api::health::health,
        api::health::ready,
        // Job records
        api::jobs::list_jobs,
        api::jobs::create_job,
        api::jobs::get_job,
        api::jobs::update_job,
        api::jobs::patch_job,
        api::jobs::delete_job,
        // Feedback
        api::feedbacks::list_feedbacks,
        api::feedbacks::create_feedback,
        api::feedbacks::get_feedback,
        api::feedbacks::update_feedback,
        api::feedbacks::patch_feedback,
        api::feedbacks::delete_feedback,
        // Statistics
        api::stats::top_salaries,
        api::stats::salary_by_experience,
        api::stats::jobs_by_location,
        api::stats::remote_ratio,
        api::stats::dashboard,
        api::stats::job_average_rating,
        api::stats::job_title_average_rating,
        // Auth endpoints
        services::auth_admin::create_api_key,
        services::auth_admin::list_api_keys,
        services::auth_admin::revoke_api_key,
    ),
    components(
        schemas(
            // Common
            error::ErrorResponse,
            // Health
            api::health::HealthResponse,
            api::health::ReadyResponse,
            // Catalog
            models::Category,
            models::Contract,
            models::Skill,
            models::Industry,
            models::JobTitle,
            models::Location,
            models::Candidate,
            models::NameInput,
            models::NamePatch,
            models::ContractInput,
            models::ContractPatch,
            models::LocationInput,
            models::LocationPatch,
            models::CandidateInput,
            models::CandidatePatch,
            // Job records and feedback
            models::Currency,
            models::CompanySize,
            models::JobRecordDetail,
            models::JobRecordInput,
            models::JobRecordPatch,
            models::Feedback,
            models::FeedbackInput,
            models::FeedbackPatch,
            // Statistics
            models::TitleSalary,
            models::ExperienceSalary,
            models::LocationCount,
            models::RemoteSummary,
            models::DashboardRow,
            models::AverageRating,
            // Auth
            models::ApiKeyRole,
            models::ApiKeyCreateResponse,
            models::ApiKeyListItem,
            models::CreateApiKeyRequest,
            services::auth_admin::ListApiKeysResponse,
            services::auth_admin::RevokeApiKeyResponse,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Jobs", description = "Job records"),
        (name = "Feedback", description = "Candidate feedback on job records"),
        (name = "Statistics", description = "Salary, location and rating aggregates"),
        (name = "Auth", description = "API key management")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

/// Add API key security scheme.
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                utoipa::openapi::security::SecurityScheme::ApiKey(
                    utoipa::openapi::security::ApiKey::Header(
                        utoipa::openapi::security::ApiKeyValue::new(crate::config::API_KEY_HEADER),
                    ),
                ),
            );
        }
    }
}

#[get("/openapi.json")]
pub async fn openapi_json() -> HttpResponse {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(openapi_json);
}
