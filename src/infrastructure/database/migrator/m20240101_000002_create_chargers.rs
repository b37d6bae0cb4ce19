//! Create chargers table

use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Chargers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Chargers::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Chargers::OwnerId).string().not_null())
                    .col(ColumnDef::new(Chargers::Name).string().not_null())
                    .col(ColumnDef::new(Chargers::Location).string())
                    .col(ColumnDef::new(Chargers::Latitude).double().not_null())
                    .col(ColumnDef::new(Chargers::Longitude).double().not_null())
                    .col(
                        ColumnDef::new(Chargers::Status)
                            .string_len(20)
                            .not_null()
                            .default("active"),
                    )
                    .col(ColumnDef::new(Chargers::PowerOutputKw).double())
                    .col(ColumnDef::new(Chargers::ConnectorType).string())
                    .col(
                        ColumnDef::new(Chargers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Chargers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chargers_owner")
                            .from(Chargers::Table, Chargers::OwnerId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chargers_owner_id")
                    .table(Chargers::Table)
                    .col(Chargers::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_chargers_status")
                    .table(Chargers::Table)
                    .col(Chargers::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Chargers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Chargers {
    Table,
    Id,
    OwnerId,
    Name,
    Location,
    Latitude,
    Longitude,
    Status,
    PowerOutputKw,
    ConnectorType,
    CreatedAt,
    UpdatedAt,
}
