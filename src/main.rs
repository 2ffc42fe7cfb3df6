// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use noticrawl::boards::factory::BoardAdapters;
use noticrawl::config::settings::Settings;
use noticrawl::domain::services::classifier::ClassifierCascade;
use noticrawl::domain::services::notice_service::NoticeService;
use noticrawl::engines::reqwest_engine::ReqwestFetcher;
use noticrawl::infrastructure::database::connection;
use noticrawl::infrastructure::metrics;
use noticrawl::infrastructure::repositories::notice_repo_impl::NoticeRepositoryImpl;
use noticrawl::utils::telemetry;
use noticrawl::workers::manager::WorkerManager;
use noticrawl::workers::notice_worker::NoticePipeline;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use url::Url;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并运行抓取
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting noticrawl...");

    // 2. Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    info!(sources = settings.sources.len(), "Configuration loaded");

    if let Some(addr) = &settings.metrics.listen_addr {
        metrics::init_metrics(addr);
    }

    // 3. Connect to database and apply migrations
    let db = connection::connect_and_migrate(&settings.database)
        .await
        .context("failed to prepare database")?;
    let db = Arc::new(db);
    info!("Database connection established");

    // 4. Build fetcher, adapters, classifier and pipeline
    let fetcher = Arc::new(ReqwestFetcher::new(&settings.crawler)?);
    let site_root = Url::parse(&settings.crawler.base_url)
        .with_context(|| format!("invalid crawler.base_url {}", settings.crawler.base_url))?;
    let adapters = BoardAdapters::new(&site_root, fetcher)?;

    let classifier = Arc::new(ClassifierCascade::from_settings(&settings.classifier));
    info!(
        threshold = classifier.threshold(),
        model = classifier.has_model(),
        remote = classifier.has_remote(),
        "Classifier ready"
    );

    let notices = NoticeService::new(Arc::new(NoticeRepositoryImpl::new(db)));
    let pipeline = Arc::new(NoticePipeline::new(adapters, notices, classifier));
    let manager = WorkerManager::new(pipeline, settings.sources.clone());

    // 5. Run once, or keep running on an interval
    match settings.crawler.run_interval_secs {
        Some(secs) => manager.run_forever(Duration::from_secs(secs)).await,
        None => {
            let report = manager.run_cycle().await?;
            info!(
                stored = report.items_stored(),
                skipped = report.items_skipped(),
                "Single crawl cycle complete"
            );
        }
    }

    Ok(())
}
