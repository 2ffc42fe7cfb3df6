// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::boards::parsing::{
    enclosing_row, extract_detail, normalized_text, parse_listed_date, parse_views, selector,
};
use crate::boards::traits::BoardAdapter;
use crate::domain::models::notice::{NoticeDetail, RawListItem};
use crate::domain::models::source::{BoardKind, NoticeSource};
use crate::engines::traits::{FetchError, FetchRequest, PageFetcher};
use crate::utils::url_utils::resolve_http_url;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::sync::Arc;
use url::Url;

/// 列表页路径
pub const LIST_BOARD_PATH: &str = "_prog/_board/";

static TITLE_ANCHOR: Lazy<Selector> = Lazy::new(|| selector("td.title a"));
static DATE_CELL: Lazy<Selector> = Lazy::new(|| selector("td.date"));
static HITS_CELL: Lazy<Selector> = Lazy::new(|| selector("td.hits"));
static BODY: Lazy<Selector> = Lazy::new(|| selector(".board_viewDetail"));
static INFO: Lazy<Selector> = Lazy::new(|| {
    selector(".board_view .top_info, .view_info, .board_view .viewtop, .board_view .info")
});

/// 通用分页公告板
///
/// 表格布局，每行包含标题、日期和浏览次数单元格
pub struct ListBoard {
    base_url: Url,
    fetcher: Arc<dyn PageFetcher>,
}

impl ListBoard {
    /// # 参数
    ///
    /// * `site_root` - 站点根地址，如 `https://plus.cnu.ac.kr`
    /// * `fetcher` - 共享的页面抓取器
    pub fn new(site_root: &Url, fetcher: Arc<dyn PageFetcher>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: board_base(site_root, LIST_BOARD_PATH)?,
            fetcher,
        })
    }

    fn list_query(source: &NoticeSource, page: u32) -> Vec<(String, String)> {
        vec![
            (
                "code".to_string(),
                source.board_code.clone().unwrap_or_default(),
            ),
            ("site_dvs_cd".to_string(), "kr".to_string()),
            ("menu_dvs_cd".to_string(), source.menu_code.clone()),
            ("skey".to_string(), String::new()),
            ("sval".to_string(), String::new()),
            ("site_dvs".to_string(), String::new()),
            ("ntt_tag".to_string(), String::new()),
            ("GotoPage".to_string(), page.to_string()),
        ]
    }
}

/// 站点根地址下的公告板目录，保证以 `/` 结尾以便相对链接解析
pub(crate) fn board_base(site_root: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut root = site_root.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root.join(path)
}

#[async_trait]
impl BoardAdapter for ListBoard {
    fn kind(&self) -> BoardKind {
        BoardKind::ListBoard
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

        document
            .select(&TITLE_ANCHOR)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                let url = resolve_http_url(&self.base_url, href)?;
                let mut item = RawListItem::new(normalized_text(anchor), url);

                if let Some(row) = enclosing_row(anchor) {
                    item.listed_on = row
                        .select(&DATE_CELL)
                        .next()
                        .and_then(|cell| parse_listed_date(&normalized_text(cell)));
                    item.views = row
                        .select(&HITS_CELL)
                        .next()
                        .and_then(|cell| parse_views(&normalized_text(cell)));
                }
                Some(item)
            })
            .collect()
    }

    async fn fetch_detail(&self, url: &Url) -> Result<String, FetchError> {
        self.fetcher.fetch(&FetchRequest::detail(url.clone())).await
    }

    fn parse_detail(&self, html: &str) -> NoticeDetail {
        extract_detail(html, &BODY, &INFO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct NoFetch;

    #[async_trait]
    impl PageFetcher for NoFetch {
        async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError> {
            Err(FetchError::FetchFailed {
                url: request.target().to_string(),
                attempts: 1,
                permanent: true,
                reason: "offline".to_string(),
            })
        }
    }

    fn board() -> ListBoard {
        let root = Url::parse("https://plus.cnu.ac.kr").unwrap();
        ListBoard::new(&root, Arc::new(NoFetch)).unwrap()
    }

    const LIST_HTML: &str = r#"
        <table class="board_list">
          <tbody>
            <tr>
              <td class="num">12</td>
              <td class="title"><a href="?mode=V&amp;no=12">  2025학년도 2학기
                 수강신청 안내 </a></td>
              <td class="date">2025.08.20</td>
              <td class="hits">1,024</td>
            </tr>
            <tr>
              <td class="num">11</td>
              <td class="title"><a href="/_prog/_board/?mode=V&amp;no=11">AI 개발자 채용</a></td>
              <td class="date">-</td>
              <td class="hits"></td>
            </tr>
            <tr>
              <td class="title"><a href="javascript:void(0)">비공개</a></td>
            </tr>
          </tbody>
        </table>"#;

    #[test]
    fn test_board_base_handles_trailing_slash() {
        let with_slash = Url::parse("http://127.0.0.1:8080/").unwrap();
        let without_path = Url::parse("http://127.0.0.1:8080").unwrap();
        let nested = Url::parse("http://127.0.0.1:8080/mirror").unwrap();

        assert_eq!(
            board_base(&with_slash, LIST_BOARD_PATH).unwrap().as_str(),
            "http://127.0.0.1:8080/_prog/_board/"
        );
        assert_eq!(
            board_base(&without_path, LIST_BOARD_PATH).unwrap().as_str(),
            "http://127.0.0.1:8080/_prog/_board/"
        );
        assert_eq!(
            board_base(&nested, LIST_BOARD_PATH).unwrap().as_str(),
            "http://127.0.0.1:8080/mirror/_prog/_board/"
        );
    }

    #[test]
    fn test_list_query_parameters() {
        let source = crate::domain::models::source::default_sources()
            .into_iter()
            .next()
            .unwrap();
        let query = ListBoard::list_query(&source, 2);
        let keys: Vec<&str> = query.iter().map(|(k, _)| k.as_str()).collect();

        assert_eq!(
            keys,
            vec!["code", "site_dvs_cd", "menu_dvs_cd", "skey", "sval", "site_dvs", "ntt_tag", "GotoPage"]
        );
        assert_eq!(query[0].1, "sub07_0704");
        assert_eq!(query[2].1, "0704");
        assert_eq!(query[7].1, "2");
    }

    #[test]
    fn test_parse_list_reads_row_metadata() {
        let items = board().parse_list(LIST_HTML);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "2025학년도 2학기 수강신청 안내");
        assert_eq!(
            items[0].url.as_str(),
            "https://plus.cnu.ac.kr/_prog/_board/?mode=V&no=12"
        );
        assert_eq!(items[0].listed_on, NaiveDate::from_ymd_opt(2025, 8, 20));
        assert_eq!(items[0].views, Some(1024));

        assert_eq!(items[1].title, "AI 개발자 채용");
        assert_eq!(items[1].listed_on, None);
        assert_eq!(items[1].views, None);
    }

    #[test]
    fn test_parse_list_without_rows() {
        assert!(board().parse_list("<html><body>점검 중</body></html>").is_empty());
    }

    #[test]
    fn test_parse_detail() {
        let html = r#"
            <div class="board_view">
              <div class="top_info"><span>작성자 학생과</span><span>등록일 2025-08-20</span></div>
              <div class="board_viewDetail">
                <p>수강신청 기간은</p>
                <p>8월 25일부터 입니다.</p>
              </div>
            </div>"#;

        let detail = board().parse_detail(html);

        assert_eq!(detail.body, "수강신청 기간은 8월 25일부터 입니다.");
        assert_eq!(detail.posted_on, NaiveDate::from_ymd_opt(2025, 8, 20));
    }

    #[test]
    fn test_parse_detail_uses_first_info_container_only() {
        let html = r#"
            <div class="view_info">조회수 15</div>
            <div class="board_view"><div class="info">2025-01-02</div></div>
            <div class="board_viewDetail">본문</div>"#;

        let detail = board().parse_detail(html);

        assert_eq!(detail.body, "본문");
        assert_eq!(detail.posted_on, None);
    }

    #[tokio::test]
    async fn test_fetch_errors_are_passed_through() {
        let source = crate::domain::models::source::default_sources()
            .into_iter()
            .next()
            .unwrap();
        let err = board().fetch_list_page(&source, 1).await.unwrap_err();
        assert!(err.is_permanent());
        assert!(err.url().contains("GotoPage=1"));
    }
}
