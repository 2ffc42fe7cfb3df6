// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::source::NoticeSource;
use crate::domain::repositories::notice_repository::NoticeRepository;
use crate::utils::errors::PipelineError;
use crate::workers::notice_worker::{NoticePipeline, SourceReport};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{error, info};

/// 一轮抓取的汇总
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// 主机分组数，也就是并行工作任务数
    pub host_groups: usize,
    pub sources: Vec<SourceReport>,
}

impl CycleReport {
    pub fn items_stored(&self) -> u32 {
        self.sources.iter().map(|s| s.items_stored).sum()
    }

    pub fn items_skipped(&self) -> u32 {
        self.sources.iter().map(|s| s.items_skipped).sum()
    }

    pub fn pages_skipped(&self) -> u32 {
        self.sources.iter().map(|s| s.pages_skipped).sum()
    }
}

/// 工作管理器
///
/// 按主机把来源分组，每组一个任务：组内顺序处理，组间并行
pub struct WorkerManager<R: NoticeRepository + 'static> {
    pipeline: Arc<NoticePipeline<R>>,
    sources: Vec<NoticeSource>,
}

impl<R: NoticeRepository + 'static> WorkerManager<R> {
    pub fn new(pipeline: Arc<NoticePipeline<R>>, sources: Vec<NoticeSource>) -> Self {
        Self { pipeline, sources }
    }

    /// 按适配器主机分组，保持来源的配置顺序
    pub fn host_groups(&self) -> Vec<(String, Vec<NoticeSource>)> {
        let mut groups: Vec<(String, Vec<NoticeSource>)> = Vec::new();
        for source in &self.sources {
            let host = self.pipeline.adapters().host_for(source);
            match groups.iter_mut().find(|(h, _)| *h == host) {
                Some((_, members)) => members.push(source.clone()),
                None => groups.push((host, vec![source.clone()])),
            }
        }
        groups
    }

    /// 执行一轮抓取
    ///
    /// 任何一组出现持久化错误时中止其余组并返回该错误
    pub async fn run_cycle(&self) -> Result<CycleReport, PipelineError> {
        let started = Instant::now();
        let groups = self.host_groups();
        let mut report = CycleReport {
            host_groups: groups.len(),
            sources: Vec::with_capacity(self.sources.len()),
        };

        let mut workers = JoinSet::new();
        for (host, sources) in groups {
            let pipeline = self.pipeline.clone();
            workers.spawn(async move {
                info!(host = %host, sources = sources.len(), "Host worker started");
                let mut reports = Vec::with_capacity(sources.len());
                for source in &sources {
                    reports.push(pipeline.process_source(source).await?);
                }
                Ok::<_, PipelineError>(reports)
            });
        }

        while let Some(joined) = workers.join_next().await {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => Err(PipelineError::Worker(e.to_string())),
            };
            match outcome {
                Ok(reports) => report.sources.extend(reports),
                Err(e) => {
                    error!(error = %e, "Aborting crawl cycle");
                    workers.abort_all();
                    return Err(e);
                }
            }
        }

        report.sources.sort_by_key(|s| s.source_id);
        info!(
            sources = report.sources.len(),
            stored = report.items_stored(),
            skipped = report.items_skipped(),
            pages_skipped = report.pages_skipped(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Crawl cycle finished"
        );
        Ok(report)
    }

    /// 持续运行，直到收到 Ctrl-C
    ///
    /// 单轮失败只记录日志，下一轮照常开始
    pub async fn run_forever(&self, interval: Duration) {
        loop {
            tokio::select! {
                result = self.run_cycle() => {
                    if let Err(e) = result {
                        error!(error = %e, "Crawl cycle failed");
                    }
                }
                _ = shutdown_signal() => break,
            }

            info!(next_in_secs = interval.as_secs(), "Waiting for next cycle");
            tokio::select! {
                _ = tokio::time::sleep(interval) => {}
                _ = shutdown_signal() => break,
            }
        }
        info!("Workers shut down successfully");
    }
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
            // never resolve so the loop keeps running without signal support
            std::future::pending::<()>().await
        }
    }
}
