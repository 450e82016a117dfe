//! Job record repository.

use std::collections::{BTreeSet, HashMap};

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use sea_orm::sea_query::{Expr, Query};
use sea_orm::*;

use super::{DbPool, commit, contains_ignore_case, write_error};
use crate::entity::{
    candidate, contract, feedback, industry, job_record, job_record_skill, job_title, location,
    skill,
};
use crate::error::{AppError, AppResult, FieldErrors, db_error};
use crate::models::job_record::display_name;
use crate::models::validation::INVALID_CHOICE;
use crate::models::{
    Candidate, Contract, Industry, JobRecordDetail, NewJobRecord, Skill,
};
use crate::services::listing::{ListingPage, ListingQuery, ListingSpec};

pub const DUPLICATE_RECORD: &str =
    "Job record with this job title, work year and company location already exists.";

/// Stored amounts always carry two decimal places. Values read back through
/// a float on SQLite are snapped to the nearest cent, half away from zero.
pub fn money(value: Decimal) -> Decimal {
    let mut value = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(2);
    value
}

pub async fn find_model<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<job_record::Model>> {
    job_record::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get job record"))
}

/// One page of job records. Search, sort and paging run in SQL; only the
/// rows of the page get their catalog references loaded.
pub async fn list_page<C: ConnectionTrait>(
    db: &C,
    spec: &ListingSpec,
    query: &ListingQuery,
) -> AppResult<ListingPage<JobRecordDetail>> {
    let mut select = job_record::Entity::find().inner_join(job_title::Entity);

    if let Some(needle) = &query.search {
        let mut matches = Condition::any();
        for field in spec.search_fields {
            match *field {
                "job_title" => {
                    matches = matches.add(contains_ignore_case(
                        Expr::col((job_title::Entity, job_title::Column::Name)),
                        needle,
                    ));
                }
                "employee_residence" => {
                    let codes = Query::select()
                        .column(location::Column::Id)
                        .from(location::Entity)
                        .and_where(contains_ignore_case(
                            Expr::col((location::Entity, location::Column::CountryCode)),
                            needle,
                        ))
                        .to_owned();
                    matches = matches.add(job_record::Column::EmployeeResidenceId.in_subquery(codes));
                }
                _ => {}
            }
        }
        select = select.filter(matches);
    }

    let order = if query.sort.descending {
        Order::Desc
    } else {
        Order::Asc
    };
    select = match query.sort.field.as_str() {
        "created_at" => select.order_by(job_record::Column::CreatedAt, order),
        "work_year" => select.order_by(job_record::Column::WorkYear, order),
        "remote_ratio" => select.order_by(job_record::Column::RemoteRatio, order),
        "job_title" => select.order_by(job_title::Column::Name, order),
        _ => select.order_by(job_record::Column::SalaryInUsd, order),
    }
    .order_by_asc(job_record::Column::Id);

    let total_count = select
        .clone()
        .count(db)
        .await
        .map_err(db_error("Failed to count job records"))? as usize;
    let window = query.window(total_count);
    let models = select
        .offset(window.offset())
        .limit(window.limit())
        .all(db)
        .await
        .map_err(db_error("Failed to list job records"))?;

    let items = load_details(db, models).await?;
    Ok(ListingPage::new(items, total_count, &window, query))
}

#[derive(Debug, FromQueryResult)]
struct JobChoiceRow {
    id: i32,
    job_title: String,
    work_year: i32,
    salary_in_usd: Decimal,
}

/// `(id, label)` of every job record ordered by title name, for select boxes.
pub async fn job_choices<C: ConnectionTrait>(db: &C) -> AppResult<Vec<(i32, String)>> {
    let rows = job_record::Entity::find()
        .select_only()
        .column(job_record::Column::Id)
        .column_as(job_title::Column::Name, "job_title")
        .column(job_record::Column::WorkYear)
        .column(job_record::Column::SalaryInUsd)
        .inner_join(job_title::Entity)
        .order_by_asc(job_title::Column::Name)
        .order_by_asc(job_record::Column::Id)
        .into_model::<JobChoiceRow>()
        .all(db)
        .await
        .map_err(db_error("Failed to list job choices"))?;
    Ok(rows
        .into_iter()
        .map(|r| {
            let label = display_name(&r.job_title, r.work_year, money(r.salary_in_usd));
            (r.id, label)
        })
        .collect())
}

/// Job records of one title, in id order.
pub async fn list_details_by_title<C: ConnectionTrait>(
    db: &C,
    job_title_id: i32,
) -> AppResult<Vec<JobRecordDetail>> {
    let models = job_record::Entity::find()
        .filter(job_record::Column::JobTitleId.eq(job_title_id))
        .order_by_asc(job_record::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list job records by title"))?;
    load_details(db, models).await
}

pub async fn find_detail<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<JobRecordDetail>> {
    let Some(model) = find_model(db, id).await? else {
        return Ok(None);
    };
    Ok(load_details(db, vec![model]).await?.pop())
}

/// Resolve catalog references of `models` with one query per table.
pub async fn load_details<C: ConnectionTrait>(
    db: &C,
    models: Vec<job_record::Model>,
) -> AppResult<Vec<JobRecordDetail>> {
    if models.is_empty() {
        return Ok(Vec::new());
    }

    let job_ids: Vec<i32> = models.iter().map(|m| m.id).collect();
    let title_ids: BTreeSet<i32> = models.iter().map(|m| m.job_title_id).collect();
    let location_ids: BTreeSet<i32> = models
        .iter()
        .flat_map(|m| [m.employee_residence_id, m.company_location_id])
        .collect();
    let contract_codes: BTreeSet<String> = models
        .iter()
        .flat_map(|m| [m.experience_level.clone(), m.employment_type.clone()])
        .collect();
    let industry_ids: BTreeSet<i32> = models.iter().filter_map(|m| m.industry_id).collect();
    let candidate_ids: BTreeSet<i32> = models.iter().filter_map(|m| m.candidate_id).collect();

    let titles: HashMap<i32, String> = job_title::Entity::find()
        .filter(job_title::Column::Id.is_in(title_ids))
        .all(db)
        .await
        .map_err(db_error("Failed to load job titles"))?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();
    let locations: HashMap<i32, String> = location::Entity::find()
        .filter(location::Column::Id.is_in(location_ids))
        .all(db)
        .await
        .map_err(db_error("Failed to load locations"))?
        .into_iter()
        .map(|l| (l.id, l.country_code))
        .collect();
    let contracts: HashMap<String, Contract> = contract::Entity::find()
        .filter(contract::Column::TypeCode.is_in(contract_codes))
        .all(db)
        .await
        .map_err(db_error("Failed to load contracts"))?
        .into_iter()
        .map(|c| (c.type_code.clone(), Contract::from(c)))
        .collect();
    let industries: HashMap<i32, Industry> = industry::Entity::find()
        .filter(industry::Column::Id.is_in(industry_ids))
        .all(db)
        .await
        .map_err(db_error("Failed to load industries"))?
        .into_iter()
        .map(|i| (i.id, Industry::from(i)))
        .collect();
    let candidates: HashMap<i32, Candidate> = candidate::Entity::find()
        .filter(candidate::Column::Id.is_in(candidate_ids))
        .all(db)
        .await
        .map_err(db_error("Failed to load candidates"))?
        .into_iter()
        .map(|c| (c.id, Candidate::from(c)))
        .collect();

    let links = job_record_skill::Entity::find()
        .filter(job_record_skill::Column::JobRecordId.is_in(job_ids))
        .order_by_asc(job_record_skill::Column::SkillId)
        .all(db)
        .await
        .map_err(db_error("Failed to load skill associations"))?;
    let skill_ids: BTreeSet<i32> = links.iter().map(|l| l.skill_id).collect();
    let skills: HashMap<i32, Skill> = skill::Entity::find()
        .filter(skill::Column::Id.is_in(skill_ids))
        .all(db)
        .await
        .map_err(db_error("Failed to load skills"))?
        .into_iter()
        .map(|s| (s.id, Skill::from(s)))
        .collect();
    let mut skills_by_job: HashMap<i32, Vec<Skill>> = HashMap::new();
    for link in links {
        if let Some(skill) = skills.get(&link.skill_id) {
            skills_by_job
                .entry(link.job_record_id)
                .or_default()
                .push(skill.clone());
        }
    }

    let contract_or_code = |code: &str| {
        contracts.get(code).cloned().unwrap_or_else(|| Contract {
            type_code: code.to_string(),
            description: String::new(),
        })
    };

    Ok(models
        .into_iter()
        .map(|m| JobRecordDetail {
            id: m.id,
            job_title: m.job_title_id,
            job_title_name: titles.get(&m.job_title_id).cloned().unwrap_or_default(),
            work_year: m.work_year,
            company_location: m.company_location_id,
            company_location_code: locations
                .get(&m.company_location_id)
                .cloned()
                .unwrap_or_default(),
            company_size: m.company_size,
            salary: money(m.salary),
            salary_currency: m.salary_currency,
            salary_in_usd: money(m.salary_in_usd),
            employee_residence: m.employee_residence_id,
            employee_residence_code: locations
                .get(&m.employee_residence_id)
                .cloned()
                .unwrap_or_default(),
            remote_ratio: m.remote_ratio,
            contract_experience: contract_or_code(&m.experience_level),
            contract_employment: contract_or_code(&m.employment_type),
            experience_level: m.experience_level,
            employment_type: m.employment_type,
            industry: m.industry_id.and_then(|id| industries.get(&id).cloned()),
            candidate: m.candidate_id.and_then(|id| candidates.get(&id).cloned()),
            skills: skills_by_job.remove(&m.id).unwrap_or_default(),
            created_at: m.created_at,
        })
        .collect())
}

/// Every referenced catalog row must exist; missing ones become field errors.
pub async fn check_references<C: ConnectionTrait>(db: &C, new: &NewJobRecord) -> AppResult<()> {
    let mut errors = FieldErrors::new();

    if job_title::Entity::find_by_id(new.job_title_id)
        .one(db)
        .await?
        .is_none()
    {
        errors.add("job_title", INVALID_CHOICE);
    }
    for (field, id) in [
        ("employee_residence", new.employee_residence_id),
        ("company_location", new.company_location_id),
    ] {
        if location::Entity::find_by_id(id).one(db).await?.is_none() {
            errors.add(field, INVALID_CHOICE);
        }
    }
    for (field, code) in [
        ("experience_level", &new.experience_level),
        ("employment_type", &new.employment_type),
    ] {
        if contract::Entity::find_by_id(code.clone())
            .one(db)
            .await?
            .is_none()
        {
            errors.add(field, INVALID_CHOICE);
        }
    }
    if let Some(id) = new.industry_id
        && industry::Entity::find_by_id(id).one(db).await?.is_none()
    {
        errors.add("industry", INVALID_CHOICE);
    }
    if let Some(id) = new.candidate_id
        && candidate::Entity::find_by_id(id).one(db).await?.is_none()
    {
        errors.add("candidate", INVALID_CHOICE);
    }
    if !new.skill_ids.is_empty() {
        let found = skill::Entity::find()
            .filter(skill::Column::Id.is_in(new.skill_ids.clone()))
            .count(db)
            .await?;
        if found != new.skill_ids.len() as u64 {
            errors.add("skills", INVALID_CHOICE);
        }
    }

    errors.into_result()
}

/// Whether another record already holds this (title, year, company location).
pub async fn triple_taken<C: ConnectionTrait>(
    db: &C,
    new: &NewJobRecord,
    exclude_id: Option<i32>,
) -> AppResult<bool> {
    let mut query = job_record::Entity::find()
        .filter(job_record::Column::JobTitleId.eq(new.job_title_id))
        .filter(job_record::Column::WorkYear.eq(new.work_year))
        .filter(job_record::Column::CompanyLocationId.eq(new.company_location_id));
    if let Some(id) = exclude_id {
        query = query.filter(job_record::Column::Id.ne(id));
    }
    let count = query
        .count(db)
        .await
        .map_err(db_error("Failed to check job record uniqueness"))?;
    Ok(count > 0)
}

/// Insert the record row and its skill set. Run inside a transaction.
pub async fn insert_record<C: ConnectionTrait>(db: &C, new: &NewJobRecord) -> AppResult<i32> {
    check_references(db, new).await?;
    if triple_taken(db, new, None).await? {
        return Err(AppError::Conflict(DUPLICATE_RECORD.to_string()));
    }

    let model = job_record::ActiveModel {
        work_year: Set(new.work_year),
        experience_level: Set(new.experience_level.clone()),
        employment_type: Set(new.employment_type.clone()),
        job_title_id: Set(new.job_title_id),
        salary: Set(new.salary),
        salary_currency: Set(new.salary_currency.as_str().to_string()),
        salary_in_usd: Set(new.salary_in_usd),
        employee_residence_id: Set(new.employee_residence_id),
        remote_ratio: Set(new.remote_ratio),
        company_location_id: Set(new.company_location_id),
        company_size: Set(new.company_size.as_str().to_string()),
        industry_id: Set(new.industry_id),
        candidate_id: Set(new.candidate_id),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error("Failed to insert job record", DUPLICATE_RECORD))?;

    replace_skills(db, model.id, &new.skill_ids).await?;
    Ok(model.id)
}

/// Overwrite every writable field of an existing record. Run inside a transaction.
pub async fn update_record<C: ConnectionTrait>(
    db: &C,
    id: i32,
    new: &NewJobRecord,
) -> AppResult<()> {
    let existing = find_model(db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job record {}", id)))?;
    check_references(db, new).await?;
    if triple_taken(db, new, Some(id)).await? {
        return Err(AppError::Conflict(DUPLICATE_RECORD.to_string()));
    }

    let mut active: job_record::ActiveModel = existing.into();
    active.work_year = Set(new.work_year);
    active.experience_level = Set(new.experience_level.clone());
    active.employment_type = Set(new.employment_type.clone());
    active.job_title_id = Set(new.job_title_id);
    active.salary = Set(new.salary);
    active.salary_currency = Set(new.salary_currency.as_str().to_string());
    active.salary_in_usd = Set(new.salary_in_usd);
    active.employee_residence_id = Set(new.employee_residence_id);
    active.remote_ratio = Set(new.remote_ratio);
    active.company_location_id = Set(new.company_location_id);
    active.company_size = Set(new.company_size.as_str().to_string());
    active.industry_id = Set(new.industry_id);
    active.candidate_id = Set(new.candidate_id);
    active
        .update(db)
        .await
        .map_err(write_error("Failed to update job record", DUPLICATE_RECORD))?;

    replace_skills(db, id, &new.skill_ids).await
}

/// Replace the skill set of a record.
pub async fn replace_skills<C: ConnectionTrait>(
    db: &C,
    job_record_id: i32,
    skill_ids: &[i32],
) -> AppResult<()> {
    job_record_skill::Entity::delete_many()
        .filter(job_record_skill::Column::JobRecordId.eq(job_record_id))
        .exec(db)
        .await
        .map_err(db_error("Failed to clear skills"))?;

    if skill_ids.is_empty() {
        return Ok(());
    }
    let links = skill_ids.iter().map(|&skill_id| job_record_skill::ActiveModel {
        job_record_id: Set(job_record_id),
        skill_id: Set(skill_id),
    });
    job_record_skill::Entity::insert_many(links)
        .exec(db)
        .await
        .map_err(db_error("Failed to attach skills"))?;
    Ok(())
}

/// Delete records with their feedback and skill links.
pub async fn delete_with_dependents<C: ConnectionTrait>(db: &C, ids: &[i32]) -> AppResult<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    feedback::Entity::delete_many()
        .filter(feedback::Column::JobId.is_in(ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_error("Failed to delete job feedback"))?;
    job_record_skill::Entity::delete_many()
        .filter(job_record_skill::Column::JobRecordId.is_in(ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_error("Failed to delete job skills"))?;
    let result = job_record::Entity::delete_many()
        .filter(job_record::Column::Id.is_in(ids.to_vec()))
        .exec(db)
        .await
        .map_err(db_error("Failed to delete job records"))?;
    Ok(result.rows_affected)
}

impl DbPool {
    /// Create a job record and its skill set atomically.
    pub async fn create_job_record(&self, new: &NewJobRecord) -> AppResult<JobRecordDetail> {
        let txn = self.begin().await?;
        let id = insert_record(&txn, new).await?;
        let detail = find_detail(&txn, id)
            .await?
            .ok_or_else(|| AppError::Database(format!("Job record {} vanished after insert", id)))?;
        commit(txn).await?;
        Ok(detail)
    }

    pub async fn update_job_record(
        &self,
        id: i32,
        new: &NewJobRecord,
    ) -> AppResult<JobRecordDetail> {
        let txn = self.begin().await?;
        update_record(&txn, id, new).await?;
        let detail = find_detail(&txn, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Job record {}", id)))?;
        commit(txn).await?;
        Ok(detail)
    }

    /// Delete a record with its feedback. `false` when it did not exist.
    pub async fn delete_job_record(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        let deleted = delete_with_dependents(&txn, &[id]).await?;
        commit(txn).await?;
        Ok(deleted > 0)
    }
}
