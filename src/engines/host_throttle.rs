// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// 每主机并发信号量管理器
///
/// 为每个远程主机提供一个独立的信号量，限制同时发往该主机的请求数。
#[derive(Clone, Debug)]
pub struct HostThrottle {
    /// 存储每个主机的信号量
    semaphores: Arc<DashMap<String, Arc<Semaphore>>>,
    /// 每个主机的并发数
    permits_per_host: usize,
}

impl HostThrottle {
    /// 创建一个新的HostThrottle实例
    ///
    /// # 参数
    ///
    /// * `permits_per_host` - 每个主机的并发许可数，至少为 1
    pub fn new(permits_per_host: usize) -> Self {
        Self {
            semaphores: Arc::new(DashMap::new()),
            permits_per_host: permits_per_host.max(1),
        }
    }

    /// 获取指定主机的许可
    ///
    /// 如果该主机的信号量不存在，则会创建一个新的。
    /// 信号量从不关闭，返回 `None` 只在极端情况下出现，调用方可直接放行。
    pub async fn acquire(&self, host: &str) -> Option<OwnedSemaphorePermit> {
        self.get_or_create(host).acquire_owned().await.ok()
    }

    /// 当前可用许可数，主机尚未出现时为满额
    #[cfg(test)]
    pub fn available(&self, host: &str) -> usize {
        self.semaphores
            .get(host)
            .map(|s| s.available_permits())
            .unwrap_or(self.permits_per_host)
    }

    fn get_or_create(&self, host: &str) -> Arc<Semaphore> {
        self.semaphores
            .entry(host.to_string())
            .or_insert_with(|| Arc::new(Semaphore::new(self.permits_per_host)))
            .clone()
    }
}
