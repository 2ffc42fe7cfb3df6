// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use migration::{Migrator, MigratorTrait};
use noticrawl::domain::models::source::{BoardKind, NoticeSource};
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::sync::Arc;

/// 创建已迁移的内存数据库
///
/// 内存SQLite每个连接是独立的库，所以连接池只保留一个连接
pub async fn memory_db() -> Arc<DatabaseConnection> {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(opt)
        .await
        .expect("Failed to open in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    Arc::new(db)
}

pub async fn notice_repo() -> (Arc<NoticeRepositoryImpl>, Arc<DatabaseConnection>) {
    let db = memory_db().await;
    (Arc::new(NoticeRepositoryImpl::new(db.clone())), db)
}

/// 只抓一页的通用公告板来源
pub fn list_source(id: i32, board_code: &str, menu_code: &str) -> NoticeSource {
    NoticeSource {
        id,
        name: format!("test-{}", menu_code),
        kind: BoardKind::ListBoard,
        board_code: Some(board_code.to_string()),
        menu_code: menu_code.to_string(),
        pages: 1,
    }
}
