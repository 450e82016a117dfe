//! Job catalog server library.
//!
//! Reference catalog, job records, candidate feedback, salary statistics and
//! the HTTP surfaces over them: a REST API under `/api` and server-rendered
//! pages at the root.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod entity;
pub mod error;
pub mod middleware;
pub mod migration;
pub mod models;
pub mod pages;
pub mod services;

use actix_web::web;

/// Extractor settings and every route. Shared by the server and the tests;
/// state (`DbPool`, `AdminKey`) is attached by the caller.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::FormConfig::default().error_handler(error::form_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(web::scope("/api").configure(api::configure_routes))
        .configure(pages::configure_routes);
}
