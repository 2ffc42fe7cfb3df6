// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::notice::{NewNotice, NoticeId, NoticeRecord};
use crate::domain::repositories::notice_repository::{NoticeRepository, StoredClassification};
use crate::infrastructure::database::entities::{notice, notice_category};
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use std::sync::Arc;

/// `model_version` 列的长度上限
const MODEL_VERSION_MAX_LEN: usize = 64;

/// 公告仓库实现
///
/// 两个写操作都用 `INSERT ... ON CONFLICT DO UPDATE`，在 PostgreSQL 和 SQLite 上行为一致
#[derive(Clone)]
pub struct NoticeRepositoryImpl {
    db: Arc<DatabaseConnection>,
}

impl NoticeRepositoryImpl {
    /// 创建新的公告仓库实现
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NoticeRepository for NoticeRepositoryImpl {
    async fn upsert_notice(&self, notice: &NewNotice) -> Result<NoticeId, RepositoryError> {
        let now = Utc::now().fixed_offset();
        let model = notice::ActiveModel {
            source_id: Set(notice.source_id),
            url: Set(notice.url.clone()),
            title: Set(notice.title.clone()),
            content: Set(notice.content.clone()),
            posted_at: Set(notice.posted_on),
            hash: Set(notice.hash.clone()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        notice::Entity::insert(model)
            .on_conflict(
                OnConflict::column(notice::Column::Url)
                    .update_columns([
                        notice::Column::Title,
                        notice::Column::Content,
                        notice::Column::PostedAt,
                        notice::Column::Hash,
                        notice::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        // the conflict branch does not report an id on every backend, so read it back by key
        let stored = notice::Entity::find()
            .filter(notice::Column::Url.eq(notice.url.as_str()))
            .one(self.db.as_ref())
            .await?
            .ok_or_else(|| RepositoryError::NotFound(notice.url.clone()))?;

        Ok(stored.id)
    }

    async fn find_by_url(&self, url: &str) -> Result<Option<NoticeRecord>, RepositoryError> {
        let model = notice::Entity::find()
            .filter(notice::Column::Url.eq(url))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn upsert_classification(
        &self,
        notice_id: NoticeId,
        result: &ClassificationResult,
    ) -> Result<(), RepositoryError> {
        let model_version: String = result
            .provenance
            .tag()
            .chars()
            .take(MODEL_VERSION_MAX_LEN)
            .collect();

        let model = notice_category::ActiveModel {
            notice_id: Set(notice_id),
            category_id: Set(result.category.id()),
            confidence: Set(result.confidence),
            model_version: Set(model_version),
            classified_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        };

        notice_category::Entity::insert(model)
            .on_conflict(
                OnConflict::column(notice_category::Column::NoticeId)
                    .update_columns([
                        notice_category::Column::CategoryId,
                        notice_category::Column::Confidence,
                        notice_category::Column::ModelVersion,
                        notice_category::Column::ClassifiedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_classification(
        &self,
        notice_id: NoticeId,
    ) -> Result<Option<StoredClassification>, RepositoryError> {
        let model = notice_category::Entity::find()
            .filter(notice_category::Column::NoticeId.eq(notice_id))
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }
}

impl From<notice::Model> for NoticeRecord {
    fn from(model: notice::Model) -> Self {
        Self {
            id: model.id,
            source_id: model.source_id,
            url: model.url,
            title: model.title,
            content: model.content,
            posted_on: model.posted_at,
            hash: model.hash,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<notice_category::Model> for StoredClassification {
    fn from(model: notice_category::Model) -> Self {
        Self {
            notice_id: model.notice_id,
            category_id: model.category_id,
            confidence: model.confidence,
            model_version: model.model_version,
        }
    }
}
