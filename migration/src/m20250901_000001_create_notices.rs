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
                    .table(Notice::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notice::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notice::SourceId).integer().not_null())
                    // url is the natural key for upserts
                    .col(ColumnDef::new(Notice::Url).text().not_null().unique_key())
                    .col(ColumnDef::new(Notice::Title).text().not_null())
                    .col(ColumnDef::new(Notice::Content).text().not_null())
                    .col(ColumnDef::new(Notice::PostedAt).date())
                    .col(ColumnDef::new(Notice::Hash).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Notice::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Notice::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notice_source_id")
                    .table(Notice::Table)
                    .col(Notice::SourceId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notice::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub(crate) enum Notice {
    Table,
    Id,
    SourceId,
    Url,
    Title,
    Content,
    PostedAt,
    Hash,
    CreatedAt,
    UpdatedAt,
}
