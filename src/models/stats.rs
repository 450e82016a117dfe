//! Aggregation results.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Mean USD salary of one job title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TitleSalary {
    pub job_title: String,
    #[schema(value_type = String)]
    pub avg_salary_usd: Decimal,
}

/// Mean USD salary of one experience level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExperienceSalary {
    pub type_code: String,
    pub description: String,
    #[schema(value_type = String)]
    pub avg_salary_usd: Decimal,
}

/// Number of job records per company location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LocationCount {
    pub country_code: String,
    pub job_count: u64,
}

/// Share of fully remote job records (`remote_ratio == 100`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RemoteSummary {
    pub remote_count: u64,
    pub total_count: u64,
    /// 0 when there are no job records.
    pub percentage: f64,
}

/// Dashboard row: feedback totals of one job title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DashboardRow {
    pub job_title_id: i32,
    pub job_title: String,
    /// 0 when the title has no feedback.
    pub avg_rating: f64,
    pub feedback_count: u64,
}

/// Average feedback rating of a job or of a job-title group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AverageRating {
    /// `null` when there is no matching feedback.
    pub average_rating: Option<f64>,
    pub feedback_count: u64,
}
