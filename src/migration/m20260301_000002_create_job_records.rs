//! Migration: Create job_records and job_record_skills tables.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_catalog::{
    Candidates, Contracts, Industries, JobTitles, Locations, Skills,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(JobRecords::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobRecords::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(JobRecords::WorkYear).integer().not_null())
                    .col(
                        ColumnDef::new(JobRecords::ExperienceLevel)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::EmploymentType)
                            .string_len(10)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobRecords::JobTitleId).integer().not_null())
                    .col(
                        ColumnDef::new(JobRecords::Salary)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::SalaryCurrency)
                            .string_len(3)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::SalaryInUsd)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::EmployeeResidenceId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::RemoteRatio)
                            .integer()
                            .not_null()
                            .check(Expr::col(JobRecords::RemoteRatio).between(0, 100)),
                    )
                    .col(
                        ColumnDef::new(JobRecords::CompanyLocationId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(JobRecords::CompanySize)
                            .string_len(1)
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobRecords::IndustryId).integer().null())
                    .col(ColumnDef::new(JobRecords::CandidateId).integer().null())
                    .col(
                        ColumnDef::new(JobRecords::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_experience_level")
                            .from(JobRecords::Table, JobRecords::ExperienceLevel)
                            .to(Contracts::Table, Contracts::TypeCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_employment_type")
                            .from(JobRecords::Table, JobRecords::EmploymentType)
                            .to(Contracts::Table, Contracts::TypeCode)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_job_title")
                            .from(JobRecords::Table, JobRecords::JobTitleId)
                            .to(JobTitles::Table, JobTitles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_employee_residence")
                            .from(JobRecords::Table, JobRecords::EmployeeResidenceId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_company_location")
                            .from(JobRecords::Table, JobRecords::CompanyLocationId)
                            .to(Locations::Table, Locations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_industry")
                            .from(JobRecords::Table, JobRecords::IndustryId)
                            .to(Industries::Table, Industries::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_records_candidate")
                            .from(JobRecords::Table, JobRecords::CandidateId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_job_records_title_year_location")
                    .table(JobRecords::Table)
                    .col(JobRecords::JobTitleId)
                    .col(JobRecords::WorkYear)
                    .col(JobRecords::CompanyLocationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_job_records_company_location")
                    .table(JobRecords::Table)
                    .col(JobRecords::CompanyLocationId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(JobRecordSkills::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(JobRecordSkills::JobRecordId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(JobRecordSkills::SkillId).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(JobRecordSkills::JobRecordId)
                            .col(JobRecordSkills::SkillId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_record_skills_job_record")
                            .from(JobRecordSkills::Table, JobRecordSkills::JobRecordId)
                            .to(JobRecords::Table, JobRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_job_record_skills_skill")
                            .from(JobRecordSkills::Table, JobRecordSkills::SkillId)
                            .to(Skills::Table, Skills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(JobRecordSkills::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(JobRecords::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum JobRecords {
    Table,
    Id,
    WorkYear,
    ExperienceLevel,
    EmploymentType,
    JobTitleId,
    Salary,
    SalaryCurrency,
    SalaryInUsd,
    EmployeeResidenceId,
    RemoteRatio,
    CompanyLocationId,
    CompanySize,
    IndustryId,
    CandidateId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum JobRecordSkills {
    Table,
    JobRecordId,
    SkillId,
}
