// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 启动 Prometheus 导出器
///
/// 地址无法解析或端口被占用时只记录警告，抓取流程不受影响
pub fn init_metrics(listen_addr: &str) {
    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!(listen_addr, error = %e, "Invalid metrics address, exporter disabled");
            return;
        }
    };

    // Ignore error if address is already in use (for development/testing)
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}. This might happen if the port is already in use.", e);
        return;
    }

    metrics::describe_counter!(
        "notice_fetch_attempts_total",
        "HTTP fetch attempts by outcome (success, retryable, permanent)"
    );
    metrics::describe_counter!(
        "notice_fetch_failures_total",
        "Fetches that gave up after a permanent failure or exhausted retries"
    );

    info!("Metrics exporter listening on {}", addr);
}
