//! Migration: Create reference catalog tables.
//!
//! Categories, contracts, skills, industries, job titles, locations and candidates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(named_table(Categories::Table, Categories::Id, Categories::Name, 100))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Contracts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contracts::TypeCode)
                            .string_len(10)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Contracts::Description)
                            .string_len(255)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(named_table(Skills::Table, Skills::Id, Skills::Name, 255))
            .await?;
        manager
            .create_table(named_table(
                Industries::Table,
                Industries::Id,
                Industries::Name,
                255,
            ))
            .await?;
        manager
            .create_table(named_table(
                JobTitles::Table,
                JobTitles::Id,
                JobTitles::Name,
                255,
            ))
            .await?;
        manager
            .create_table(named_table(
                Locations::Table,
                Locations::Id,
                Locations::CountryCode,
                10,
            ))
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Candidates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Candidates::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Candidates::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Candidates::Email)
                            .string_len(254)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Candidates::Location)
                            .string_len(100)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            Candidates::Table.into_iden(),
            Locations::Table.into_iden(),
            JobTitles::Table.into_iden(),
            Industries::Table.into_iden(),
            Skills::Table.into_iden(),
            Contracts::Table.into_iden(),
            Categories::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}

/// Table with an auto-increment id and a single unique string column.
fn named_table<T, C>(table: T, id: C, name: C, len: u32) -> TableCreateStatement
where
    T: IntoIden,
    C: IntoIden,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(name).string_len(len).not_null().unique_key())
        .to_owned()
}

#[derive(DeriveIden)]
pub enum Categories {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Contracts {
    Table,
    TypeCode,
    Description,
}

#[derive(DeriveIden)]
pub enum Skills {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Industries {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum JobTitles {
    Table,
    Id,
    Name,
}

#[derive(DeriveIden)]
pub enum Locations {
    Table,
    Id,
    CountryCode,
}

#[derive(DeriveIden)]
pub enum Candidates {
    Table,
    Id,
    Name,
    Email,
    Location,
}
