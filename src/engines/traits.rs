// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// 抓取错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// 重试耗尽或遇到不可重试的响应
    #[error("Fetch failed for {url} after {attempts} attempt(s): {reason}")]
    FetchFailed {
        url: String,
        attempts: u32,
        /// 为 true 时没有发生任何重试（如 4xx）
        permanent: bool,
        reason: String,
    },
}

impl FetchError {
    /// 判断错误是否是永久性的
    ///
    /// # 返回值
    ///
    /// 4xx 等不可重试的失败返回true，重试耗尽返回false
    pub fn is_permanent(&self) -> bool {
        match self {
            FetchError::FetchFailed { permanent, .. } => *permanent,
        }
    }

    pub fn attempts(&self) -> u32 {
        match self {
            FetchError::FetchFailed { attempts, .. } => *attempts,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            FetchError::FetchFailed { url, .. } => url,
        }
    }
}

/// 单次请求的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Success(String),
    /// 超时、连接失败或 500/502/503/504
    RetryableFailure(String),
    /// 4xx 及其他非成功状态，不重试
    PermanentFailure(String),
}

/// 重试预算
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RetryBudget {
    /// 列表页，默认重试 3 次
    List,
    /// 详情页，默认重试 2 次
    Detail,
}

/// 抓取请求
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    /// 目标URL
    pub url: Url,
    /// 追加到URL上的查询参数
    pub query: Vec<(String, String)>,
    pub budget: RetryBudget,
}

impl FetchRequest {
    pub fn list(url: Url, query: Vec<(String, String)>) -> Self {
        Self {
            url,
            query,
            budget: RetryBudget::List,
        }
    }

    pub fn detail(url: Url) -> Self {
        Self {
            url,
            query: Vec::new(),
            budget: RetryBudget::Detail,
        }
    }

    /// 带查询参数的完整地址
    pub fn target(&self) -> Url {
        let mut url = self.url.clone();
        if !self.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        }
        url
    }
}

/// 页面抓取特质
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取页面HTML
    ///
    /// 内部完成礼貌延迟、限流与重试，失败时返回 `FetchError::FetchFailed`
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError>;
}
