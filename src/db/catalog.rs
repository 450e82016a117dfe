//! Reference catalog repositories.
//!
//! Deleting a row that job records point at follows the record's foreign key
//! rules: job titles, locations, contracts and candidates take their job
//! records (and those records' feedback) with them, industries are detached,
//! skills are removed from every skill set.

use sea_orm::sea_query::{Condition, Expr};
use sea_orm::*;

use super::{DbPool, commit, job_records, write_error};
use crate::entity::{
    candidate, category, contract, feedback, industry, job_record, job_record_skill, job_title,
    location, skill,
};
use crate::error::{AppError, AppResult, db_error};
use crate::models::{Candidate, Category, Contract, Industry, JobTitle, Location, NewCandidate, Skill};

// Categories

pub async fn list_categories<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Category>> {
    let rows = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list categories"))?;
    Ok(rows.into_iter().map(Category::from).collect())
}

pub async fn find_category<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Category>> {
    let row = category::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get category"))?;
    Ok(row.map(Category::from))
}

pub async fn insert_category<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Category> {
    let model = category::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert category",
        "Category with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_category<C: ConnectionTrait>(db: &C, id: i32, name: &str) -> AppResult<Category> {
    let existing = category::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Category {}", id)))?;
    let mut active: category::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update category",
        "Category with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn delete_category<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<bool> {
    let result = category::Entity::delete_by_id(id)
        .exec(db)
        .await
        .map_err(db_error("Failed to delete category"))?;
    Ok(result.rows_affected > 0)
}

// Contracts

pub async fn list_contracts<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Contract>> {
    let rows = contract::Entity::find()
        .order_by_asc(contract::Column::TypeCode)
        .all(db)
        .await
        .map_err(db_error("Failed to list contracts"))?;
    Ok(rows.into_iter().map(Contract::from).collect())
}

pub async fn find_contract<C: ConnectionTrait>(db: &C, code: &str) -> AppResult<Option<Contract>> {
    let row = contract::Entity::find_by_id(code.to_string())
        .one(db)
        .await
        .map_err(db_error("Failed to get contract"))?;
    Ok(row.map(Contract::from))
}

pub async fn insert_contract<C: ConnectionTrait>(db: &C, new: &Contract) -> AppResult<Contract> {
    let model = contract::ActiveModel {
        type_code: Set(new.type_code.clone()),
        description: Set(new.description.clone()),
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert contract",
        "Contract with this type code already exists.",
    ))?;
    Ok(model.into())
}

/// Change the description; the type code is the key and never changes.
pub async fn update_contract<C: ConnectionTrait>(
    db: &C,
    code: &str,
    description: &str,
) -> AppResult<Contract> {
    let existing = contract::Entity::find_by_id(code.to_string())
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Contract {}", code)))?;
    let mut active: contract::ActiveModel = existing.into();
    active.description = Set(description.to_string());
    let model = active
        .update(db)
        .await
        .map_err(db_error("Failed to update contract"))?;
    Ok(model.into())
}

/// Find a contract by code or create it with the given description.
pub async fn get_or_create_contract<C: ConnectionTrait>(
    db: &C,
    code: &str,
    default_description: &str,
) -> AppResult<(Contract, bool)> {
    if let Some(existing) = find_contract(db, code).await? {
        return Ok((existing, false));
    }
    let created = insert_contract(
        db,
        &Contract {
            type_code: code.to_string(),
            description: default_description.to_string(),
        },
    )
    .await?;
    Ok((created, true))
}

// Skills

pub async fn list_skills<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Skill>> {
    let rows = skill::Entity::find()
        .order_by_asc(skill::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list skills"))?;
    Ok(rows.into_iter().map(Skill::from).collect())
}

pub async fn find_skill<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Skill>> {
    let row = skill::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get skill"))?;
    Ok(row.map(Skill::from))
}

pub async fn insert_skill<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Skill> {
    let model = skill::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert skill",
        "Skill with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_skill<C: ConnectionTrait>(db: &C, id: i32, name: &str) -> AppResult<Skill> {
    let existing = skill::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {}", id)))?;
    let mut active: skill::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update skill",
        "Skill with this name already exists.",
    ))?;
    Ok(model.into())
}

// Industries

pub async fn list_industries<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Industry>> {
    let rows = industry::Entity::find()
        .order_by_asc(industry::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list industries"))?;
    Ok(rows.into_iter().map(Industry::from).collect())
}

pub async fn find_industry<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Industry>> {
    let row = industry::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get industry"))?;
    Ok(row.map(Industry::from))
}

pub async fn insert_industry<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<Industry> {
    let model = industry::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert industry",
        "Industry with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_industry<C: ConnectionTrait>(db: &C, id: i32, name: &str) -> AppResult<Industry> {
    let existing = industry::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Industry {}", id)))?;
    let mut active: industry::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update industry",
        "Industry with this name already exists.",
    ))?;
    Ok(model.into())
}

// Job titles

pub async fn list_job_titles<C: ConnectionTrait>(db: &C) -> AppResult<Vec<JobTitle>> {
    let rows = job_title::Entity::find()
        .order_by_asc(job_title::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list job titles"))?;
    Ok(rows.into_iter().map(JobTitle::from).collect())
}

pub async fn find_job_title<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<JobTitle>> {
    let row = job_title::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get job title"))?;
    Ok(row.map(JobTitle::from))
}

pub async fn insert_job_title<C: ConnectionTrait>(db: &C, name: &str) -> AppResult<JobTitle> {
    let model = job_title::ActiveModel {
        name: Set(name.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert job title",
        "Job title with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_job_title<C: ConnectionTrait>(db: &C, id: i32, name: &str) -> AppResult<JobTitle> {
    let existing = job_title::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Job title {}", id)))?;
    let mut active: job_title::ActiveModel = existing.into();
    active.name = Set(name.to_string());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update job title",
        "Job title with this name already exists.",
    ))?;
    Ok(model.into())
}

pub async fn get_or_create_job_title<C: ConnectionTrait>(
    db: &C,
    name: &str,
) -> AppResult<(JobTitle, bool)> {
    let existing = job_title::Entity::find()
        .filter(job_title::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(db_error("Failed to look up job title"))?;
    match existing {
        Some(model) => Ok((model.into(), false)),
        None => Ok((insert_job_title(db, name).await?, true)),
    }
}

// Locations

pub async fn list_locations<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Location>> {
    let rows = location::Entity::find()
        .order_by_asc(location::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list locations"))?;
    Ok(rows.into_iter().map(Location::from).collect())
}

pub async fn find_location<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Location>> {
    let row = location::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get location"))?;
    Ok(row.map(Location::from))
}

pub async fn insert_location<C: ConnectionTrait>(db: &C, country_code: &str) -> AppResult<Location> {
    let model = location::ActiveModel {
        country_code: Set(country_code.to_string()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert location",
        "Location with this country code already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_location<C: ConnectionTrait>(
    db: &C,
    id: i32,
    country_code: &str,
) -> AppResult<Location> {
    let existing = location::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {}", id)))?;
    let mut active: location::ActiveModel = existing.into();
    active.country_code = Set(country_code.to_string());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update location",
        "Location with this country code already exists.",
    ))?;
    Ok(model.into())
}

pub async fn get_or_create_location<C: ConnectionTrait>(
    db: &C,
    country_code: &str,
) -> AppResult<(Location, bool)> {
    let existing = location::Entity::find()
        .filter(location::Column::CountryCode.eq(country_code))
        .one(db)
        .await
        .map_err(db_error("Failed to look up location"))?;
    match existing {
        Some(model) => Ok((model.into(), false)),
        None => Ok((insert_location(db, country_code).await?, true)),
    }
}

// Candidates

pub async fn list_candidates<C: ConnectionTrait>(db: &C) -> AppResult<Vec<Candidate>> {
    let rows = candidate::Entity::find()
        .order_by_asc(candidate::Column::Id)
        .all(db)
        .await
        .map_err(db_error("Failed to list candidates"))?;
    Ok(rows.into_iter().map(Candidate::from).collect())
}

pub async fn find_candidate<C: ConnectionTrait>(db: &C, id: i32) -> AppResult<Option<Candidate>> {
    let row = candidate::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(db_error("Failed to get candidate"))?;
    Ok(row.map(Candidate::from))
}

pub async fn insert_candidate<C: ConnectionTrait>(db: &C, new: &NewCandidate) -> AppResult<Candidate> {
    let model = candidate::ActiveModel {
        name: Set(new.name.clone()),
        email: Set(new.email.clone()),
        location: Set(new.location.clone()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(write_error(
        "Failed to insert candidate",
        "Candidate with this email already exists.",
    ))?;
    Ok(model.into())
}

pub async fn update_candidate<C: ConnectionTrait>(
    db: &C,
    id: i32,
    new: &NewCandidate,
) -> AppResult<Candidate> {
    let existing = candidate::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Candidate {}", id)))?;
    let mut active: candidate::ActiveModel = existing.into();
    active.name = Set(new.name.clone());
    active.email = Set(new.email.clone());
    active.location = Set(new.location.clone());
    let model = active.update(db).await.map_err(write_error(
        "Failed to update candidate",
        "Candidate with this email already exists.",
    ))?;
    Ok(model.into())
}

/// Ids of the job records matching `condition`.
async fn job_ids_where<C: ConnectionTrait>(db: &C, condition: Condition) -> AppResult<Vec<i32>> {
    job_record::Entity::find()
        .select_only()
        .column(job_record::Column::Id)
        .filter(condition)
        .into_tuple::<i32>()
        .all(db)
        .await
        .map_err(db_error("Failed to collect dependent job records"))
}

impl DbPool {
    /// Delete a job title with its job records.
    pub async fn delete_job_title(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        let job_ids =
            job_ids_where(&txn, Condition::all().add(job_record::Column::JobTitleId.eq(id))).await?;
        job_records::delete_with_dependents(&txn, &job_ids).await?;
        let result = job_title::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete job title"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete a location with every job record living or located there.
    pub async fn delete_location(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        let job_ids = job_ids_where(
            &txn,
            Condition::any()
                .add(job_record::Column::EmployeeResidenceId.eq(id))
                .add(job_record::Column::CompanyLocationId.eq(id)),
        )
        .await?;
        job_records::delete_with_dependents(&txn, &job_ids).await?;
        let result = location::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete location"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete a contract with every job record using it as level or type.
    pub async fn delete_contract(&self, code: &str) -> AppResult<bool> {
        let txn = self.begin().await?;
        let job_ids = job_ids_where(
            &txn,
            Condition::any()
                .add(job_record::Column::ExperienceLevel.eq(code))
                .add(job_record::Column::EmploymentType.eq(code)),
        )
        .await?;
        job_records::delete_with_dependents(&txn, &job_ids).await?;
        let result = contract::Entity::delete_by_id(code.to_string())
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete contract"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete a candidate with their feedback and the job records naming them.
    pub async fn delete_candidate(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        feedback::Entity::delete_many()
            .filter(feedback::Column::AuthorId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete candidate feedback"))?;
        let job_ids =
            job_ids_where(&txn, Condition::all().add(job_record::Column::CandidateId.eq(id))).await?;
        job_records::delete_with_dependents(&txn, &job_ids).await?;
        let result = candidate::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete candidate"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete an industry, detaching the job records that referenced it.
    pub async fn delete_industry(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        job_record::Entity::update_many()
            .col_expr(job_record::Column::IndustryId, Expr::value(Option::<i32>::None))
            .filter(job_record::Column::IndustryId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to detach industry"))?;
        let result = industry::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete industry"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// Delete a skill and drop it from every skill set.
    pub async fn delete_skill(&self, id: i32) -> AppResult<bool> {
        let txn = self.begin().await?;
        job_record_skill::Entity::delete_many()
            .filter(job_record_skill::Column::SkillId.eq(id))
            .exec(&txn)
            .await
            .map_err(db_error("Failed to remove skill associations"))?;
        let result = skill::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(db_error("Failed to delete skill"))?;
        commit(txn).await?;
        Ok(result.rows_affected > 0)
    }
}
