// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::boards::list_board::board_base;
use crate::boards::parsing::{extract_detail, extract_links, selector};
use crate::boards::traits::BoardAdapter;
use crate::domain::models::notice::{NoticeDetail, RawListItem};
use crate::domain::models::source::{BoardKind, NoticeSource};
use crate::engines::traits::{FetchError, FetchRequest, PageFetcher};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// 招聘公告板路径
pub const RECRUIT_BOARD_PATH: &str = "_prog/recruit/";

// 招聘板的标记并不统一，每组选择器按文档顺序取第一个命中
static TITLE_ANCHOR: Lazy<Selector> = Lazy::new(|| selector("td.title a, .title a, .subject a"));
static BODY: Lazy<Selector> =
    Lazy::new(|| selector(".board_viewDetail, .view_con, .content, .bbs_view"));
static INFO: Lazy<Selector> =
    Lazy::new(|| selector(".board_view .top_info, .bbs_view .info, .view_info, .meta"));

/// 招聘公告板
pub struct RecruitBoard {
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
}

impl RecruitBoard {
    pub fn new(site_root: &Url, fetcher: Arc<dyn PageFetcher>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: board_base(site_root, RECRUIT_BOARD_PATH)?,
            fetcher,
        })
    }

    fn list_query(source: &NoticeSource, page: u32) -> Vec<(String, String)> {
        vec![
            ("menu_dvs_cd".to_string(), source.menu_code.clone()),
            ("site_dvs_cd".to_string(), "kr".to_string()),
            ("GotoPage".to_string(), page.to_string()),
        ]
    }
}

#[async_trait]
impl BoardAdapter for RecruitBoard {
    fn kind(&self) -> BoardKind {
        BoardKind::RecruitBoard
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn fetch_list_page(
        &self,
        source: &NoticeSource,
        page: u32,
    ) -> Result<String, FetchError> {
        let request = FetchRequest::list(self.base_url.clone(), Self::list_query(source, page));
        self.fetcher.fetch(&request).await
    }

    fn parse_list(&self, html: &str) -> Vec<RawListItem> {
        let document = Html::parse_document(html);
        extract_links(&document, &TITLE_ANCHOR, &self.base_url)
    }

    async fn fetch_detail(&self, url: &Url) -> Result<String, FetchError> {
        self.fetcher.fetch(&FetchRequest::detail(url.clone())).await
    }

    fn parse_detail(&self, html: &str) -> NoticeDetail {
        extract_detail(html, &BODY, &INFO)
    }
}
