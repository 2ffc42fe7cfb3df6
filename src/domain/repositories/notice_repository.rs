// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::notice::{NewNotice, NoticeId, NoticeRecord};
use crate::utils::errors::RepositoryError;
use async_trait::async_trait;

/// 已保存的分类记录
#[derive(Debug, Clone, PartialEq)]
pub struct StoredClassification {
    pub notice_id: NoticeId,
    pub category_id: i32,
    pub confidence: f64,
    pub model_version: String,
}

/// 公告仓库特质
///
/// 定义公告与分类的持久化接口。两个写操作都是幂等的 upsert：
/// 公告以 URL 为键，分类以公告ID为键。
#[async_trait]
pub trait NoticeRepository: Send + Sync {
    /// 按URL插入或更新公告，返回该行ID
    async fn upsert_notice(&self, notice: &NewNotice) -> Result<NoticeId, RepositoryError>;
    /// 根据URL查找公告
    async fn find_by_url(&self, url: &str) -> Result<Option<NoticeRecord>, RepositoryError>;
    /// 插入或覆盖公告的当前分类
    async fn upsert_classification(
        &self,
        notice_id: NoticeId,
        result: &ClassificationResult,
    ) -> Result<(), RepositoryError>;
    /// 查找公告的当前分类
    async fn find_classification(
        &self,
        notice_id: NoticeId,
    ) -> Result<Option<StoredClassification>, RepositoryError>;
}
