// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ScrapeResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeResults::TaskId).integer().not_null())
                    .col(ColumnDef::new(ScrapeResults::Data).json().not_null())
                    .col(
                        ColumnDef::new(ScrapeResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // At most one result per task
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_results_task_id")
                    .table(ScrapeResults::Table)
                    .col(ScrapeResults::TaskId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeResults::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeResults {
    Table,
    Id,
    TaskId,
    Data,
    CreatedAt,
}
