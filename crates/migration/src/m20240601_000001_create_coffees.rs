//! Create `coffees` table.
//!
//! `id INTEGER PRIMARY KEY AUTOINCREMENT, name TEXT NOT NULL, description TEXT,
//! image_url TEXT, votes INTEGER DEFAULT 0`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Coffees::Table)
                    .if_not_exists()
                    .col(pk_auto(Coffees::Id))
                    .col(text(Coffees::Name))
                    .col(text_null(Coffees::Description))
                    .col(text_null(Coffees::ImageUrl))
                    .col(integer(Coffees::Votes).default(0))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Coffees::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Coffees { Table, Id, Name, Description, ImageUrl, Votes }
