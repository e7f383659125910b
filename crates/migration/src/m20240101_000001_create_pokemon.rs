//! Create `pokemon` table.
//!
//! Identity is a database sequence; `created_by`/`updated_by` hold the
//! principal ids stamped by the service layer.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pokemon::Table)
                    .if_not_exists()
                    .col(integer(Pokemon::Id).primary_key().auto_increment())
                    .col(string_len(Pokemon::Name, 255).not_null())
                    .col(integer(Pokemon::Height).not_null())
                    .col(integer(Pokemon::Weight).not_null())
                    .col(string_len(Pokemon::Image, 2048).not_null())
                    .col(integer(Pokemon::CreatedBy).not_null())
                    .col(integer(Pokemon::UpdatedBy).not_null())
                    .col(
                        timestamp_with_time_zone(Pokemon::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Pokemon::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Pokemon::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Pokemon { Table, Id, Name, Height, Weight, Image, CreatedBy, UpdatedBy, CreatedAt, UpdatedAt }
