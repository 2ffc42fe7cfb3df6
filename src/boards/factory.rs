// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::boards::list_board::ListBoard;
use crate::boards::recruit_board::RecruitBoard;
use crate::boards::traits::BoardAdapter;
use crate::domain::models::source::{BoardKind, NoticeSource};
use crate::engines::traits::PageFetcher;
use crate::utils::url_utils::host_key;
use std::sync::Arc;
use url::Url;

/// 适配器注册表
///
/// 每种布局一个共享实例，按来源的布局类型分发
#[derive(Clone)]
pub struct BoardAdapters {
    list: Arc<dyn BoardAdapter>,
    recruit: Arc<dyn BoardAdapter>,
}

impl BoardAdapters {
    /// 在同一个站点根地址下创建两种适配器
    pub fn new(site_root: &Url, fetcher: Arc<dyn PageFetcher>) -> Result<Self, url::ParseError> {
        Ok(Self {
            list: Arc::new(ListBoard::new(site_root, fetcher.clone())?),
            recruit: Arc::new(RecruitBoard::new(site_root, fetcher)?),
        })
    }

    /// 使用自定义适配器，测试中使用
    pub fn from_adapters(list: Arc<dyn BoardAdapter>, recruit: Arc<dyn BoardAdapter>) -> Self {
        Self { list, recruit }
    }

    pub fn for_source(&self, source: &NoticeSource) -> Arc<dyn BoardAdapter> {
        match source.kind {
            BoardKind::ListBoard => self.list.clone(),
            BoardKind::RecruitBoard => self.recruit.clone(),
        }
    }

    /// 来源所在的主机，用于把来源分组到工作任务
    pub fn host_for(&self, source: &NoticeSource) -> String {
        host_key(self.for_source(source).base_url())
    }
}
