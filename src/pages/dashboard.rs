//! Dashboard page.

use actix_web::{HttpResponse, get, web};
use serde::Serialize;

use super::render;
use crate::db::DbPool;
use crate::error::AppResult;
use crate::models::{DashboardRow, RemoteSummary};
use crate::services::stats;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(dashboard);
}

#[derive(Serialize)]
struct DashboardContext {
    stats: Vec<DashboardRow>,
    remote: RemoteSummary,
}

/// Feedback totals per job title plus the remote share.
#[get("/dashboard")]
pub async fn dashboard(pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let context = DashboardContext {
        stats: stats::dashboard(pool.get_ref()).await?,
        remote: stats::remote_ratio(pool.get_ref()).await?,
    };
    render("dashboard.html", context)
}
