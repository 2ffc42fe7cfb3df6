// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::CrawlerSettings;
use crate::engines::host_throttle::HostThrottle;
use crate::engines::traits::{FetchError, FetchOutcome, FetchRequest, PageFetcher, RetryBudget};
use crate::utils::retry_policy::{PolitenessDelay, RetryPolicy};
use crate::utils::url_utils::host_key;
use async_trait::async_trait;
use reqwest::StatusCode;
use std::time::Instant;
use tracing::{debug, warn};
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的HTTP抓取，负责礼貌延迟、每主机限流和退避重试
pub struct ReqwestFetcher {
    client: reqwest::Client,
    list_policy: RetryPolicy,
    detail_policy: RetryPolicy,
    politeness: PolitenessDelay,
    throttle: HostThrottle,
}

impl ReqwestFetcher {
    /// 根据抓取配置创建
    pub fn new(settings: &CrawlerSettings) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout())
            .cookie_store(true)
            .build()?;

        Ok(Self::with_client(
            client,
            settings.retry_policy(settings.list_max_retries),
            settings.retry_policy(settings.detail_max_retries),
            PolitenessDelay::from_millis(settings.delay_min_ms, settings.delay_max_ms),
            HostThrottle::new(settings.per_host_concurrency),
        ))
    }

    pub fn with_client(
        client: reqwest::Client,
        list_policy: RetryPolicy,
        detail_policy: RetryPolicy,
        politeness: PolitenessDelay,
        throttle: HostThrottle,
    ) -> Self {
        Self {
            client,
            list_policy,
            detail_policy,
            politeness,
            throttle,
        }
    }

    fn policy_for(&self, budget: RetryBudget) -> &RetryPolicy {
        match budget {
            RetryBudget::List => &self.list_policy,
            RetryBudget::Detail => &self.detail_policy,
        }
    }

    /// 执行一次请求
    async fn attempt(&self, url: &Url) -> FetchOutcome {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => return classify_transport_error(&e),
        };

        let status = response.status();
        if status.is_success() {
            return match response.text().await {
                Ok(html) => FetchOutcome::Success(html),
                Err(e) => FetchOutcome::RetryableFailure(format!("failed to read body: {}", e)),
            };
        }
        classify_status(status)
    }
}

/// 将传输层错误映射为重试类别：只有超时和连接失败值得重试
pub fn classify_transport_error(error: &reqwest::Error) -> FetchOutcome {
    if error.is_timeout() || error.is_connect() {
        FetchOutcome::RetryableFailure(error.to_string())
    } else {
        FetchOutcome::PermanentFailure(error.to_string())
    }
}

/// 将非成功状态码映射为重试类别
pub fn classify_status(status: StatusCode) -> FetchOutcome {
    let reason = format!("HTTP {}", status);
    match status {
        StatusCode::INTERNAL_SERVER_ERROR
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => FetchOutcome::RetryableFailure(reason),
        _ => FetchOutcome::PermanentFailure(reason),
    }
}

#[async_trait]
impl PageFetcher for ReqwestFetcher {
    /// 抓取页面
    ///
    /// # 参数
    ///
    /// * `request` - 抓取请求
    ///
    /// # 返回值
    ///
    /// * `Ok(String)` - 页面HTML
    /// * `Err(FetchError)` - 永久失败或重试耗尽
    async fn fetch(&self, request: &FetchRequest) -> Result<String, FetchError> {
        let url = request.target();
        let host = host_key(&url);
        let policy = self.policy_for(request.budget);
        let mut attempts = 0u32;

        loop {
            // the permit covers the politeness delay and the request, not the backoff
            let outcome = {
                let _permit = self.throttle.acquire(&host).await;
                self.politeness.wait().await;
                let start = Instant::now();
                let outcome = self.attempt(&url).await;
                debug!(
                    url = %url,
                    attempt = attempts + 1,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Fetch attempt finished"
                );
                outcome
            };
            attempts += 1;

            let reason = match outcome {
                FetchOutcome::Success(html) => {
                    metrics::counter!("notice_fetch_attempts_total", "outcome" => "success")
                        .increment(1);
                    return Ok(html);
                }
                FetchOutcome::PermanentFailure(reason) => {
                    metrics::counter!("notice_fetch_attempts_total", "outcome" => "permanent")
                        .increment(1);
                    metrics::counter!("notice_fetch_failures_total").increment(1);
                    warn!(url = %url, attempts, reason = %reason, "Permanent fetch failure, not retrying");
                    return Err(FetchError::FetchFailed {
                        url: url.to_string(),
                        attempts,
                        permanent: true,
                        reason,
                    });
                }
                FetchOutcome::RetryableFailure(reason) => {
                    metrics::counter!("notice_fetch_attempts_total", "outcome" => "retryable")
                        .increment(1);
                    reason
                }
            };

            let retries_done = attempts - 1;
            if !policy.should_retry(retries_done) {
                metrics::counter!("notice_fetch_failures_total").increment(1);
                warn!(url = %url, attempts, reason = %reason, "Retries exhausted");
                return Err(FetchError::FetchFailed {
                    url: url.to_string(),
                    attempts,
                    permanent: false,
                    reason,
                });
            }

            let backoff = policy.calculate_backoff(retries_done);
            warn!(
                url = %url,
                attempt = attempts,
                max_attempts = policy.max_attempts(),
                backoff_ms = backoff.as_millis() as u64,
                reason = %reason,
                "Retryable fetch failure, backing off"
            );
            tokio::time::sleep(backoff).await;
        }
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
