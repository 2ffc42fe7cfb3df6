// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::notice::{NewNotice, NoticeId};
use crate::domain::repositories::notice_repository::NoticeRepository;
use crate::utils::errors::RepositoryError;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

/// 公告去重/写入服务
///
/// 计算内容指纹并以 URL 为键执行幂等写入。指纹只用于标记内容变化，
/// 不参与去重判断。
pub struct NoticeService<R: NoticeRepository> {
    repo: Arc<R>,
}

impl<R: NoticeRepository> Clone for NoticeService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<R: NoticeRepository> NoticeService<R> {
    /// 创建新的公告服务实例
    ///
    /// # 参数
    ///
    /// * `repo` - 公告仓库实例
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// 写入公告
    ///
    /// 同一 URL 再次写入时覆盖标题、正文、日期和指纹，并返回原有ID。
    ///
    /// # 参数
    ///
    /// * `source_id` - 来源ID
    /// * `url` - 公告的规范URL
    /// * `title` - 标题
    /// * `body` - 正文，缺失时按空字符串处理
    /// * `posted_on` - 发布日期
    ///
    /// # 返回值
    ///
    /// * `Ok(NoticeId)` - 写入后可立即读取的行ID
    /// * `Err(RepositoryError)` - 存储不可用
    pub async fn upsert(
        &self,
        source_id: i32,
        url: &str,
        title: &str,
        body: Option<&str>,
        posted_on: Option<NaiveDate>,
    ) -> Result<NoticeId, RepositoryError> {
        if url.trim().is_empty() {
            return Err(RepositoryError::InvalidParameter(
                "notice url must not be empty".to_string(),
            ));
        }

        let content = body.unwrap_or_default();
        let notice = NewNotice {
            source_id,
            url: url.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            posted_on,
            hash: fingerprint(title, Some(content)),
        };

        let id = self.repo.upsert_notice(&notice).await?;
        debug!(notice_id = id, url, hash = %notice.hash, "Notice upserted");
        Ok(id)
    }

    /// 保存公告的当前分类，覆盖旧结果
    pub async fn record_classification(
        &self,
        notice_id: NoticeId,
        result: &ClassificationResult,
    ) -> Result<(), RepositoryError> {
        self.repo.upsert_classification(notice_id, result).await
    }
}

/// 计算内容指纹
///
/// SHA-256(`title + "|" + body`) 的小写十六进制表示，正文缺失时按空字符串处理
pub fn fingerprint(title: &str, body: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(title.as_bytes());
    hasher.update(b"|");
    hasher.update(body.unwrap_or_default().as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
#[path = "notice_service_test.rs"]
mod tests;
