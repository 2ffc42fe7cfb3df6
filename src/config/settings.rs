// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::{default_sources, NoticeSource};
use crate::utils::retry_policy::RetryPolicy;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含数据库、抓取、分类、指标和来源列表
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 抓取配置
    pub crawler: CrawlerSettings,
    /// 分类器配置
    pub classifier: ClassifierSettings,
    /// 指标导出配置
    #[serde(default)]
    pub metrics: MetricsSettings,
    /// 公告来源，未配置时使用内置注册表
    #[serde(default = "default_sources")]
    pub sources: Vec<NoticeSource>,
}

/// 数据库配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 启动时执行迁移
    #[serde(default = "default_true")]
    pub run_migrations: bool,
}

/// 抓取配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerSettings {
    /// 公告板站点根地址
    pub base_url: String,
    /// 请求前礼貌延迟下限（毫秒）
    pub delay_min_ms: u64,
    /// 请求前礼貌延迟上限（毫秒）
    pub delay_max_ms: u64,
    /// 单次请求超时（秒）
    pub request_timeout_secs: u64,
    /// 每个主机允许的并发请求数
    pub per_host_concurrency: usize,
    /// User-Agent
    pub user_agent: String,
    /// 列表页最大重试次数
    pub list_max_retries: u32,
    /// 详情页最大重试次数
    pub detail_max_retries: u32,
    /// 初始退避（毫秒）
    pub initial_backoff_ms: u64,
    /// 最大退避（毫秒）
    pub max_backoff_ms: u64,
    /// 退避乘数
    pub backoff_multiplier: f64,
    /// 退避抖动上限（毫秒）
    pub jitter_ms: u64,
    /// 连续运行时两轮之间的间隔（秒），未设置时只运行一轮
    pub run_interval_secs: Option<u64>,
}

impl CrawlerSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// 给定重试次数的退避策略
    pub fn retry_policy(&self, max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
            backoff_multiplier: self.backoff_multiplier,
            jitter: Duration::from_millis(self.jitter_ms),
        }
    }
}

/// 分类器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ClassifierSettings {
    /// 各层通过的置信度阈值
    pub confidence_threshold: f64,
    /// 训练模型文件路径，未设置时跳过模型层
    pub model_path: Option<String>,
    /// 远程分类配置
    pub remote: RemoteClassifierSettings,
}

/// 远程分类配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteClassifierSettings {
    /// API 密钥，缺失时远程层关闭
    pub api_key: Option<String>,
    /// 模型名称
    pub model: String,
    /// API 基础地址
    pub api_base_url: String,
    /// 请求超时（秒）
    pub timeout_secs: u64,
}

/// 指标导出配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 监听地址，例如 `0.0.0.0:9000`
    pub listen_addr: Option<String>,
}

fn default_true() -> bool {
    true
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加内置默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `NOTICRAWL__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::with_defaults(Config::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("NOTICRAWL").separator("__"));

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_env_fallbacks();
        settings.validate()?;
        Ok(settings)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let remote_model =
            std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());

        builder
            // Default DB settings
            .set_default("database.url", "sqlite://noticrawl.db?mode=rwc")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.run_migrations", true)?
            // Default crawler settings
            .set_default("crawler.base_url", "https://plus.cnu.ac.kr")?
            .set_default("crawler.delay_min_ms", 800)?
            .set_default("crawler.delay_max_ms", 2500)?
            .set_default("crawler.request_timeout_secs", 15)?
            .set_default("crawler.per_host_concurrency", 1)?
            .set_default(
                "crawler.user_agent",
                "Mozilla/5.0 (compatible; noticrawl/0.1; +https://plus.cnu.ac.kr)",
            )?
            .set_default("crawler.list_max_retries", 3)?
            .set_default("crawler.detail_max_retries", 2)?
            .set_default("crawler.initial_backoff_ms", 1000)?
            .set_default("crawler.max_backoff_ms", 30_000)?
            .set_default("crawler.backoff_multiplier", 2.0)?
            .set_default("crawler.jitter_ms", 1000)?
            // Default classifier settings
            .set_default("classifier.confidence_threshold", 0.7)?
            .set_default("classifier.remote.model", remote_model)?
            .set_default("classifier.remote.api_base_url", "https://api.openai.com/v1")?
            .set_default("classifier.remote.timeout_secs", 30)
    }

    /// 未显式配置 API 密钥时回退到 `OPENAI_API_KEY`
    fn apply_env_fallbacks(&mut self) {
        if self.classifier.remote.api_key.is_none() {
            self.classifier.remote.api_key = std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty());
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.crawler.delay_min_ms > self.crawler.delay_max_ms {
            return Err(ConfigError::Message(format!(
                "crawler.delay_min_ms ({}) must not exceed crawler.delay_max_ms ({})",
                self.crawler.delay_min_ms, self.crawler.delay_max_ms
            )));
        }
        if !(0.0..=1.0).contains(&self.classifier.confidence_threshold) {
            return Err(ConfigError::Message(format!(
                "classifier.confidence_threshold must be within [0, 1], got {}",
                self.classifier.confidence_threshold
            )));
        }
        if self.crawler.per_host_concurrency == 0 {
            return Err(ConfigError::Message(
                "crawler.per_host_concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
