// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm_migration::prelude::*;

use crate::m20250901_000001_create_notices::Notice;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // One active classification per notice
        manager
            .create_table(
                Table::create()
                    .table(NoticeCategory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NoticeCategory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NoticeCategory::NoticeId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(NoticeCategory::CategoryId).integer().not_null())
                    .col(ColumnDef::new(NoticeCategory::Confidence).double().not_null())
                    .col(ColumnDef::new(NoticeCategory::ModelVersion).string_len(64).not_null())
                    .col(
                        ColumnDef::new(NoticeCategory::ClassifiedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_notice_category_notice")
                            .from(NoticeCategory::Table, NoticeCategory::NoticeId)
                            .to(Notice::Table, Notice::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(NoticeCategory::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum NoticeCategory {
    Table,
    Id,
    NoticeId,
    CategoryId,
    Confidence,
    ModelVersion,
    ClassifiedAt,
}
