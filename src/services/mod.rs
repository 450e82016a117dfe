//! Business logic services.

pub mod api_key;
pub mod auth_admin;
pub mod import;
pub mod listing;
pub mod stats;

pub use auth_admin::configure_routes as configure_auth_routes;
pub use import::{ImportSummary, import_jobs};
pub use listing::{ListingPage, ListingParams};
pub use stats::SalaryReport;
