use sea_orm_migration::prelude::*;

use crate::m20240101_000001_create_pokemon::Pokemon;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Name: equality filter and sort key
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pokemon_name")
                    .table(Pokemon::Table)
                    .col(Pokemon::Name)
                    .to_owned(),
            )
            .await?;

        // Height / weight: range filters and sort keys
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pokemon_height")
                    .table(Pokemon::Table)
                    .col(Pokemon::Height)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_pokemon_weight")
                    .table(Pokemon::Table)
                    .col(Pokemon::Weight)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_pokemon_weight", "idx_pokemon_height", "idx_pokemon_name"] {
            manager
                .drop_index(Index::drop().name(name).table(Pokemon::Table).to_owned())
                .await?;
        }
        Ok(())
    }
}
