//! Query/aggregation engine.
//!
//! The aggregates run in SQL (see [`crate::db::stats`]); the functions here
//! finish the rows: salary means are rounded to cents, ratings and the remote
//! share stay exact for the renderer to format. The async wrappers turn a
//! missing job or job title into `NotFound`.

use std::fmt::Write as _;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::db::stats::{
    self as db, ExperienceSalaryRow, LocationCountRow, RatingRow, RatingScope, TitleFeedbackRow,
    TitleSalaryRow,
};
use crate::db::{DbPool, catalog, job_records};
use crate::error::{AppError, AppResult};
use crate::models::{
    AverageRating, DashboardRow, ExperienceSalary, LocationCount, RemoteSummary, TitleSalary,
};

/// Remote means fully remote.
const REMOTE_RATIO: i32 = 100;

/// Round half away from zero to two places, as SQL `ROUND(x, 2)` does.
fn round_amount(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    value
}

fn count(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}

/// Mean rating; `None` for an empty set.
pub fn average_rating(row: RatingRow) -> AverageRating {
    let feedback_count = count(row.feedback_count);
    let average_rating = if feedback_count == 0 {
        None
    } else {
        row.average_rating.and_then(|avg| avg.to_f64())
    };
    AverageRating {
        average_rating,
        feedback_count,
    }
}

pub fn title_salary(row: TitleSalaryRow) -> TitleSalary {
    TitleSalary {
        job_title: row.job_title,
        avg_salary_usd: round_amount(row.avg_salary_usd),
    }
}

/// A level without a contract row reports an empty description.
pub fn experience_salary(row: ExperienceSalaryRow) -> ExperienceSalary {
    ExperienceSalary {
        type_code: row.type_code,
        description: row.description.unwrap_or_default(),
        avg_salary_usd: round_amount(row.avg_salary_usd),
    }
}

pub fn location_count(row: LocationCountRow) -> LocationCount {
    LocationCount {
        country_code: row.country_code,
        job_count: count(row.job_count),
    }
}

/// Exact share of fully remote records; 0 when there are none at all.
pub fn remote_ratio_summary(remote_count: u64, total_count: u64) -> RemoteSummary {
    let percentage = if total_count > 0 {
        remote_count as f64 / total_count as f64 * 100.0
    } else {
        0.0
    };
    RemoteSummary {
        remote_count,
        total_count,
        percentage,
    }
}

/// Titles without feedback report an average of 0, unlike [`average_rating`].
pub fn dashboard_row(row: TitleFeedbackRow) -> DashboardRow {
    let summary = average_rating(RatingRow {
        average_rating: row.avg_rating,
        feedback_count: row.feedback_count,
    });
    DashboardRow {
        job_title_id: row.job_title_id,
        job_title: row.job_title,
        avg_rating: summary.average_rating.unwrap_or(0.0),
        feedback_count: summary.feedback_count,
    }
}

// Loaders

/// Titles by mean USD salary, highest first, at most `n`.
pub async fn top_salaries(pool: &DbPool, n: usize) -> AppResult<Vec<TitleSalary>> {
    let rows = db::title_salaries(pool.connection(), n as u64).await?;
    Ok(rows.into_iter().map(title_salary).collect())
}

/// Mean USD salary per experience level, ordered by level code.
pub async fn salary_by_experience(pool: &DbPool) -> AppResult<Vec<ExperienceSalary>> {
    let rows = db::experience_salaries(pool.connection()).await?;
    Ok(rows.into_iter().map(experience_salary).collect())
}

/// Job count per company location, most jobs first.
pub async fn jobs_by_location(pool: &DbPool) -> AppResult<Vec<LocationCount>> {
    let rows = db::location_counts(pool.connection()).await?;
    Ok(rows.into_iter().map(location_count).collect())
}

pub async fn remote_ratio(pool: &DbPool) -> AppResult<RemoteSummary> {
    let (remote, total) = db::remote_counts(pool.connection(), REMOTE_RATIO).await?;
    Ok(remote_ratio_summary(remote, total))
}

/// One row per job title with job records, ordered by title name.
pub async fn dashboard(pool: &DbPool) -> AppResult<Vec<DashboardRow>> {
    let rows = db::title_feedback(pool.connection()).await?;
    Ok(rows.into_iter().map(dashboard_row).collect())
}

/// Average rating of one job record.
pub async fn job_average_rating(
    pool: &DbPool,
    job_id: i32,
    min_rating: Option<i32>,
) -> AppResult<AverageRating> {
    let conn = pool.connection();
    if job_records::find_model(conn, job_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job record {}", job_id)));
    }
    let row = db::rating_summary(conn, RatingScope::Job(job_id), min_rating).await?;
    Ok(average_rating(row))
}

/// Average rating over every job record of a title.
pub async fn job_title_average_rating(
    pool: &DbPool,
    job_title_id: i32,
    min_rating: Option<i32>,
) -> AppResult<AverageRating> {
    let conn = pool.connection();
    if catalog::find_job_title(conn, job_title_id).await?.is_none() {
        return Err(AppError::NotFound(format!("Job title {}", job_title_id)));
    }
    let row = db::rating_summary(conn, RatingScope::JobTitle(job_title_id), min_rating).await?;
    Ok(average_rating(row))
}

/// The four salary and remote-work reports.
#[derive(Debug, Clone)]
pub struct SalaryReport {
    pub top_n: usize,
    pub top_titles: Vec<TitleSalary>,
    pub by_experience: Vec<ExperienceSalary>,
    pub by_location: Vec<LocationCount>,
    pub remote: RemoteSummary,
}

impl SalaryReport {
    pub async fn load(pool: &DbPool, top_n: usize) -> AppResult<Self> {
        Ok(Self {
            top_n,
            top_titles: top_salaries(pool, top_n).await?,
            by_experience: salary_by_experience(pool).await?,
            by_location: jobs_by_location(pool).await?,
            remote: remote_ratio(pool).await?,
        })
    }

    /// Plain-text rendering, one section per report.
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(
            out,
            "=== Top {} Job Titles with Highest Salaries (USD) ===",
            self.top_n
        );
        for (i, row) in self.top_titles.iter().enumerate() {
            let _ = writeln!(
                out,
                "{}. {}: {} USD",
                i + 1,
                row.job_title,
                format_usd(row.avg_salary_usd)
            );
        }
        out.push('\n');

        let _ = writeln!(out, "=== Average Salary by Experience Level ===");
        for row in &self.by_experience {
            let _ = writeln!(
                out,
                "{} ({}): {} USD",
                row.type_code,
                row.description,
                format_usd(row.avg_salary_usd)
            );
        }
        out.push('\n');

        let _ = writeln!(out, "=== Number of Jobs by Company Location ===");
        for row in &self.by_location {
            let _ = writeln!(out, "{}: {} jobs", row.country_code, row.job_count);
        }
        out.push('\n');

        let _ = writeln!(out, "=== Remote Jobs Ratio ===");
        let _ = writeln!(
            out,
            "100% Remote Jobs: {} out of {} ({:.2}%)",
            self.remote.remote_count, self.remote.total_count, self.remote.percentage
        );
        out
    }
}

/// `$1,234,567.89`
pub fn format_usd(value: Decimal) -> String {
    let text = round_amount(value).abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}${}.{}", sign, grouped, fraction)
}
