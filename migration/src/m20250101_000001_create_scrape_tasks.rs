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
                    .table(ScrapeTasks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ScrapeTasks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ScrapeTasks::Url).text().not_null())
                    .col(
                        ColumnDef::new(ScrapeTasks::Status)
                            .string()
                            .not_null()
                            .default("queued"),
                    )
                    .col(ColumnDef::new(ScrapeTasks::ReportPath).text())
                    .col(
                        ColumnDef::new(ScrapeTasks::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ScrapeTasks::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Workers poll by status in creation order
        manager
            .create_index(
                Index::create()
                    .name("idx_scrape_tasks_status")
                    .table(ScrapeTasks::Table)
                    .col(ScrapeTasks::Status)
                    .col(ScrapeTasks::Id)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ScrapeTasks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ScrapeTasks {
    Table,
    Id,
    Url,
    Status,
    ReportPath,
    CreatedAt,
    UpdatedAt,
}
