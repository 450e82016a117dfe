//! REST API endpoint modules, mounted under `/api`.

pub mod catalog;
pub mod feedbacks;
pub mod health;
pub mod jobs;
pub mod openapi;
pub mod stats;

use actix_web::web;

pub use health::configure_health_routes;
pub use openapi::ApiDoc;

/// Mount every API route. `/jobs/{id}/average-rating` and `/jobs/{id}` differ
/// in segment count, so registration order between them does not matter.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    configure_health_routes(cfg);
    openapi::configure_routes(cfg);
    jobs::configure_routes(cfg);
    feedbacks::configure_routes(cfg);
    stats::configure_routes(cfg);
    catalog::configure_routes(cfg);
    crate::services::configure_auth_routes(cfg);
}
