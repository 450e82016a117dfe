//! Feedback entity: a candidate's rating of a job record.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "feedbacks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub job_id: i32,
    pub author_id: i32,
    #[sea_orm(column_type = "Text")]
    pub comment: String,
    /// 1 to 5, also enforced by a CHECK constraint.
    pub rating: i32,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::job_record::Entity",
        from = "Column::JobId",
        to = "super::job_record::Column::Id",
        on_delete = "Cascade"
    )]
    JobRecord,
}

impl Related<super::job_record::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JobRecord.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
