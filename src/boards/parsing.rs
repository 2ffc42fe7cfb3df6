// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 公告板HTML解析的公共部分
//!
//! 两种布局只在选择器上不同，文本规整、日期识别和链接解析都在这里完成。

use crate::domain::models::notice::{NoticeDetail, RawListItem};
use crate::utils::url_utils::resolve_http_url;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("date pattern is valid"));

/// 列表中的日期写法更随意，允许 `.` 和 `/` 分隔
static LISTED_DATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{4})[-./](\d{1,2})[-./](\d{1,2})").expect("listed date pattern is valid")
});

/// 解析CSS选择器
///
/// 选择器都是编译期常量，解析失败属于编程错误
pub fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}

/// 元素的规整文本：所有空白折叠为单个空格，首尾去空
pub fn normalized_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// 文本中第一个合法的 `YYYY-MM-DD` 日期
pub fn find_date(text: &str) -> Option<NaiveDate> {
    DATE_PATTERN
        .find_iter(text)
        .find_map(|m| NaiveDate::parse_from_str(m.as_str(), "%Y-%m-%d").ok())
}

/// 列表单元格中的日期（`2025-09-01`、`2025.09.01`、`2025/9/1`）
pub fn parse_listed_date(text: &str) -> Option<NaiveDate> {
    LISTED_DATE_PATTERN.captures_iter(text).find_map(|caps| {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        NaiveDate::from_ymd_opt(year, month, day)
    })
}

/// 浏览次数，允许千位分隔符
pub fn parse_views(text: &str) -> Option<u32> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

/// 按文档顺序提取列表中的公告链接
///
/// 没有 href、href 为空或解析后不是 http(s) 的链接被跳过
pub fn extract_links(document: &Html, anchors: &Selector, base: &Url) -> Vec<RawListItem> {
    document
        .select(anchors)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = resolve_http_url(base, href)?;
            Some(RawListItem::new(normalized_text(anchor), url))
        })
        .collect()
}

/// 锚点所在的表格行
pub fn enclosing_row(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|e| e.value().name() == "tr")
}

/// 解析详情页
///
/// 正文取第一个正文容器的规整文本，没有时为空字符串；
/// 日期取第一个信息容器中第一个合法日期。
pub fn extract_detail(html: &str, body: &Selector, info: &Selector) -> NoticeDetail {
    let document = Html::parse_document(html);

    let body = document
        .select(body)
        .next()
        .map(normalized_text)
        .unwrap_or_default();

    let posted_on = document
        .select(info)
        .next()
        .and_then(|info| find_date(&normalized_text(info)));

    NoticeDetail { body, posted_on }
}
