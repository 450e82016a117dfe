//! Aggregate queries feeding the statistics engine.
//!
//! Grouping, averages and counts run in SQL. Averages come back unrounded;
//! the engine decides how to present them.

use rust_decimal::Decimal;
use sea_orm::*;

use crate::entity::{contract, feedback, job_record, job_title, location};
use crate::error::{AppResult, db_error};

/// Which feedback rows a rating aggregate covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScope {
    Job(i32),
    JobTitle(i32),
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TitleSalaryRow {
    pub job_title: String,
    pub avg_salary_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ExperienceSalaryRow {
    pub type_code: String,
    /// `None` when the level has no contract row
    pub description: Option<String>,
    pub avg_salary_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct LocationCountRow {
    pub country_code: String,
    pub job_count: i64,
}

/// Feedback totals of a title that has job records.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct TitleFeedbackRow {
    pub job_title_id: i32,
    pub job_title: String,
    /// `None` when no job record of the title has feedback
    pub avg_rating: Option<Decimal>,
    pub feedback_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, FromQueryResult)]
pub struct RatingRow {
    pub average_rating: Option<Decimal>,
    pub feedback_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct TitleJobCountRow {
    pub id: i32,
    pub name: String,
    pub job_count: i64,
}

/// Mean USD salary per title, highest first, at most `limit` rows. Ties keep
/// the title whose first job record came first.
pub async fn title_salaries<C: ConnectionTrait>(
    db: &C,
    limit: u64,
) -> AppResult<Vec<TitleSalaryRow>> {
    job_record::Entity::find()
        .select_only()
        .column_as(job_title::Column::Name, "job_title")
        .column_as(job_record::Column::SalaryInUsd.avg(), "avg_salary_usd")
        .inner_join(job_title::Entity)
        .group_by(job_title::Column::Id)
        .group_by(job_title::Column::Name)
        .order_by(job_record::Column::SalaryInUsd.avg(), Order::Desc)
        .order_by(job_record::Column::Id.min(), Order::Asc)
        .limit(limit)
        .into_model::<TitleSalaryRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to aggregate salaries by job title"))
}

/// Mean USD salary per experience level, by level code.
pub async fn experience_salaries<C: ConnectionTrait>(
    db: &C,
) -> AppResult<Vec<ExperienceSalaryRow>> {
    job_record::Entity::find()
        .select_only()
        .column_as(job_record::Column::ExperienceLevel, "type_code")
        .column_as(contract::Column::Description, "description")
        .column_as(job_record::Column::SalaryInUsd.avg(), "avg_salary_usd")
        .join(JoinType::LeftJoin, job_record::Relation::ExperienceLevel.def())
        .group_by(job_record::Column::ExperienceLevel)
        .group_by(contract::Column::Description)
        .order_by_asc(job_record::Column::ExperienceLevel)
        .into_model::<ExperienceSalaryRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to aggregate salaries by experience level"))
}

/// Job records per company location, most first, ties by first job record.
pub async fn location_counts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<LocationCountRow>> {
    job_record::Entity::find()
        .select_only()
        .column_as(location::Column::CountryCode, "country_code")
        .column_as(job_record::Column::Id.count(), "job_count")
        .join(JoinType::InnerJoin, job_record::Relation::CompanyLocation.def())
        .group_by(location::Column::Id)
        .group_by(location::Column::CountryCode)
        .order_by(job_record::Column::Id.count(), Order::Desc)
        .order_by(job_record::Column::Id.min(), Order::Asc)
        .into_model::<LocationCountRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to count job records by location"))
}

/// `(matching, total)` job records for a remote ratio.
pub async fn remote_counts<C: ConnectionTrait>(db: &C, remote_ratio: i32) -> AppResult<(u64, u64)> {
    let total = job_record::Entity::find()
        .count(db)
        .await
        .map_err(db_error("Failed to count job records"))?;
    let remote = job_record::Entity::find()
        .filter(job_record::Column::RemoteRatio.eq(remote_ratio))
        .count(db)
        .await
        .map_err(db_error("Failed to count remote job records"))?;
    Ok((remote, total))
}

/// One row per title with job records, by title name.
pub async fn title_feedback<C: ConnectionTrait>(db: &C) -> AppResult<Vec<TitleFeedbackRow>> {
    job_record::Entity::find()
        .select_only()
        .column_as(job_title::Column::Id, "job_title_id")
        .column_as(job_title::Column::Name, "job_title")
        .column_as(feedback::Column::Rating.avg(), "avg_rating")
        .column_as(feedback::Column::Id.count(), "feedback_count")
        .inner_join(job_title::Entity)
        .left_join(feedback::Entity)
        .group_by(job_title::Column::Id)
        .group_by(job_title::Column::Name)
        .order_by_asc(job_title::Column::Name)
        .order_by_asc(job_title::Column::Id)
        .into_model::<TitleFeedbackRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to aggregate feedback by job title"))
}

/// Mean and count of the ratings in scope, optionally at or above `min_rating`.
pub async fn rating_summary<C: ConnectionTrait>(
    db: &C,
    scope: RatingScope,
    min_rating: Option<i32>,
) -> AppResult<RatingRow> {
    let mut query = feedback::Entity::find()
        .select_only()
        .column_as(feedback::Column::Rating.avg(), "average_rating")
        .column_as(feedback::Column::Id.count(), "feedback_count");
    query = match scope {
        RatingScope::Job(id) => query.filter(feedback::Column::JobId.eq(id)),
        RatingScope::JobTitle(id) => query
            .inner_join(job_record::Entity)
            .filter(job_record::Column::JobTitleId.eq(id)),
    };
    if let Some(min) = min_rating {
        query = query.filter(feedback::Column::Rating.gte(min));
    }
    let row = query
        .into_model::<RatingRow>()
        .one(db)
        .await
        .map_err(db_error("Failed to aggregate ratings"))?;
    Ok(row.unwrap_or_default())
}

/// Titles that have job records with their job count, by title name.
pub async fn title_job_counts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<TitleJobCountRow>> {
    job_record::Entity::find()
        .select_only()
        .column_as(job_title::Column::Id, "id")
        .column_as(job_title::Column::Name, "name")
        .column_as(job_record::Column::Id.count(), "job_count")
        .inner_join(job_title::Entity)
        .group_by(job_title::Column::Id)
        .group_by(job_title::Column::Name)
        .order_by_asc(job_title::Column::Name)
        .order_by_asc(job_title::Column::Id)
        .into_model::<TitleJobCountRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to count job records by title"))
}
