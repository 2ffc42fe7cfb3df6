// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use url::Url;

/// 公告ID（数据库主键）
pub type NoticeId = i32;

/// 列表页中的一行
///
/// 由适配器解析列表页得到，交给编排器后立即消费
#[derive(Debug, Clone, PartialEq)]
pub struct RawListItem {
    /// 标题
    pub title: String,
    /// 详情页绝对地址
    pub url: Url,
    /// 列表中显示的发布日期（仅部分布局提供）
    pub listed_on: Option<NaiveDate>,
    /// 浏览次数（仅部分布局提供）
    pub views: Option<u32>,
}

impl RawListItem {
    pub fn new(title: impl Into<String>, url: Url) -> Self {
        Self {
            title: title.into(),
            url,
            listed_on: None,
            views: None,
        }
    }
}

/// 详情页解析结果
///
/// 找不到正文区域时 `body` 为空字符串；日期无法识别时为 `None`，这不是错误。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeDetail {
    pub body: String,
    pub posted_on: Option<NaiveDate>,
}

impl NoticeDetail {
    /// 正文和日期都没有恢复出来
    pub fn is_empty(&self) -> bool {
        self.body.is_empty() && self.posted_on.is_none()
    }
}

/// 待写入的公告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNotice {
    pub source_id: i32,
    pub url: String,
    pub title: String,
    pub content: String,
    pub posted_on: Option<NaiveDate>,
    /// 内容指纹（title|content 的 SHA-256）
    pub hash: String,
}

/// 已持久化的公告
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoticeRecord {
    pub id: NoticeId,
    pub source_id: i32,
    pub url: String,
    pub title: String,
    pub content: String,
    pub posted_on: Option<NaiveDate>,
    pub hash: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}
