//! Migration: Create feedbacks table.

use sea_orm_migration::prelude::*;

use super::m20260301_000001_create_catalog::Candidates;
use super::m20260301_000002_create_job_records::JobRecords;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Feedbacks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Feedbacks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Feedbacks::JobId).integer().not_null())
                    .col(ColumnDef::new(Feedbacks::AuthorId).integer().not_null())
                    .col(ColumnDef::new(Feedbacks::Comment).text().not_null())
                    .col(
                        ColumnDef::new(Feedbacks::Rating)
                            .integer()
                            .not_null()
                            .check(Expr::col(Feedbacks::Rating).between(1, 5)),
                    )
                    .col(
                        ColumnDef::new(Feedbacks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_job")
                            .from(Feedbacks::Table, Feedbacks::JobId)
                            .to(JobRecords::Table, JobRecords::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_feedbacks_author")
                            .from(Feedbacks::Table, Feedbacks::AuthorId)
                            .to(Candidates::Table, Candidates::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_feedbacks_job_id")
                    .table(Feedbacks::Table)
                    .col(Feedbacks::JobId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Feedbacks::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Feedbacks {
    Table,
    Id,
    JobId,
    AuthorId,
    Comment,
    Rating,
    CreatedAt,
}
