// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::boards::factory::BoardAdapters;
use crate::boards::traits::BoardAdapter;
use crate::domain::models::classification::ClassificationResult;
use crate::domain::models::notice::{NoticeId, RawListItem};
use crate::domain::models::source::NoticeSource;
use crate::domain::repositories::notice_repository::NoticeRepository;
use crate::domain::services::classifier::ClassifierCascade;
use crate::domain::services::notice_service::NoticeService;
use crate::utils::errors::PipelineError;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 单个来源的处理统计
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub source_id: i32,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub items_seen: u32,
    pub items_stored: u32,
    pub items_skipped: u32,
}

/// 单条公告的处理结果
enum ItemOutcome {
    Stored {
        notice_id: NoticeId,
        result: ClassificationResult,
    },
    Skipped,
}

/// 公告处理流水线
///
/// 来源 → 列表页 → 公告。抓取失败只跳过对应的页或公告，
/// 持久化失败会中止当前来源并向上返回。
pub struct NoticePipeline<R: NoticeRepository> {
    adapters: BoardAdapters,
    notices: NoticeService<R>,
    classifier: Arc<ClassifierCascade>,
}

impl<R: NoticeRepository> NoticePipeline<R> {
    pub fn new(
        adapters: BoardAdapters,
        notices: NoticeService<R>,
        classifier: Arc<ClassifierCascade>,
    ) -> Self {
        Self {
            adapters,
            notices,
            classifier,
        }
    }

    pub fn adapters(&self) -> &BoardAdapters {
        &self.adapters
    }

    /// 处理一个来源的所有页
    ///
    /// # 返回值
    ///
    /// * `Ok(SourceReport)` - 处理统计，包含被跳过的页和公告
    /// * `Err(PipelineError)` - 持久化失败
    pub async fn process_source(&self, source: &NoticeSource) -> Result<SourceReport, PipelineError> {
        let adapter = self.adapters.for_source(source);
        let mut report = SourceReport {
            source_id: source.id,
            ..Default::default()
        };

        info!(
            source_id = source.id,
            source = %source.name,
            kind = %source.kind,
            pages = source.pages,
            "Processing source"
        );

        for page in 1..=source.pages {
            let html = match adapter.fetch_list_page(source, page).await {
                Ok(html) => html,
                Err(e) => {
                    warn!(source_id = source.id, page, url = e.url(), error = %e, "List page fetch failed, skipping page");
                    report.pages_skipped += 1;
                    continue;
                }
            };
            report.pages_fetched += 1;

            let items = adapter.parse_list(&html);
            let mut stored_on_page = 0u32;
            for item in &items {
                report.items_seen += 1;
                match self.process_item(source, adapter.as_ref(), item, page).await? {
                    ItemOutcome::Stored { notice_id, result } => {
                        stored_on_page += 1;
                        report.items_stored += 1;
                        info!(
                            source_id = source.id,
                            notice_id,
                            category = %result.category,
                            confidence = result.confidence,
                            provenance = %result.provenance,
                            title = %item.title,
                            "Notice stored"
                        );
                    }
                    ItemOutcome::Skipped => report.items_skipped += 1,
                }
            }

            info!(
                source_id = source.id,
                page,
                listed = items.len(),
                stored = stored_on_page,
                "Page processed"
            );
        }

        Ok(report)
    }

    async fn process_item(
        &self,
        source: &NoticeSource,
        adapter: &dyn BoardAdapter,
        item: &RawListItem,
        page: u32,
    ) -> Result<ItemOutcome, PipelineError> {
        let html = match adapter.fetch_detail(&item.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!(source_id = source.id, page, url = %item.url, error = %e, "Detail fetch failed, skipping item");
                return Ok(ItemOutcome::Skipped);
            }
        };

        let detail = adapter.parse_detail(&html);
        if detail.is_empty() {
            warn!(source_id = source.id, page, url = %item.url, "Detail page has neither body nor date, skipping item");
            return Ok(ItemOutcome::Skipped);
        }

        let posted_on = detail.posted_on.or(item.listed_on);
        let notice_id = self
            .notices
            .upsert(
                source.id,
                item.url.as_str(),
                &item.title,
                Some(detail.body.as_str()),
                posted_on,
            )
            .await?;

        let result = self.classifier.classify(&item.title, &detail.body).await;
        self.notices.record_classification(notice_id, &result).await?;
        debug!(notice_id, views = ?item.views, "Classification recorded");

        Ok(ItemOutcome::Stored { notice_id, result })
    }
}

#[cfg(test)]
#[path = "notice_worker_test.rs"]
mod tests;
