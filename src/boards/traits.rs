// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::notice::{NoticeDetail, RawListItem};
use crate::domain::models::source::{BoardKind, NoticeSource};
use crate::engines::traits::FetchError;
use async_trait::async_trait;
use url::Url;

/// 公告板适配器特质
///
/// 每种布局一个实现，编排器只通过这个特质访问公告板
#[async_trait]
pub trait BoardAdapter: Send + Sync {
    /// 适配的布局类型
    fn kind(&self) -> BoardKind;

    /// 相对链接的解析基准，也用于按主机分组
    fn base_url(&self) -> &Url;

    /// 抓取列表页（列表重试预算）
    async fn fetch_list_page(&self, source: &NoticeSource, page: u32)
        -> Result<String, FetchError>;

    /// 解析列表页，按文档顺序返回
    fn parse_list(&self, html: &str) -> Vec<RawListItem>;

    /// 抓取详情页（详情重试预算）
    async fn fetch_detail(&self, url: &Url) -> Result<String, FetchError>;

    /// 解析详情页，缺失的部分留空而不是报错
    fn parse_detail(&self, html: &str) -> NoticeDetail;
}
