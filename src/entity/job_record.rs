//! Job record entity.
//!
//! Unique on `(job_title_id, work_year, company_location_id)`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "job_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub work_year: i32,
    pub experience_level: String,
    pub employment_type: String,
    pub job_title_id: i32,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub salary: Decimal,
    pub salary_currency: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub salary_in_usd: Decimal,
    pub employee_residence_id: i32,
    pub remote_ratio: i32,
    pub company_location_id: i32,
    pub company_size: String,
    pub industry_id: Option<i32>,
    pub candidate_id: Option<i32>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_title::Entity",
        from = "Column::JobTitleId",
        to = "super::job_title::Column::Id",
        on_delete = "Cascade"
    )]
    JobTitle,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::CompanyLocationId",
        to = "super::location::Column::Id"
    )]
    CompanyLocation,
    #[sea_orm(
        belongs_to = "super::contract::Entity",
        from = "Column::ExperienceLevel",
        to = "super::contract::Column::TypeCode"
    )]
    ExperienceLevel,
    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::job_title::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobTitle.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
