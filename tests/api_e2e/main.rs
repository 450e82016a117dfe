//! HTTP end-to-end test suite.
//!
//! Drives the full application (REST API and pages) against an in-memory
//! SQLite database, one fresh database per test.
//!
//! Run with: cargo test --test api_e2e

mod test_helpers;

mod test_auth;
mod test_catalog;
mod test_feedback;
mod test_import;
mod test_jobs;
mod test_pages;
mod test_skills;
mod test_stats;
