// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::{info, warn};

/// 轮询次数，按状态分类
pub const POLL_ATTEMPTS_TOTAL: &str = "prewarm_poll_attempts_total";
/// 预热失败的标识数，按目标分类
pub const IDENTIFIERS_FAILED_TOTAL: &str = "prewarm_identifiers_failed_total";
/// 代理探测次数，按结论分类
pub const PROXY_PROBES_TOTAL: &str = "proxy_probes_total";

/// 启动 Prometheus 导出器
///
/// 未配置监听地址时不安装，指标调用退化为空操作
pub fn init_metrics(listen_addr: Option<&str>) {
    let Some(listen_addr) = listen_addr else {
        return;
    };

    let addr: SocketAddr = match listen_addr.parse() {
        Ok(addr) => addr,
        Err(e) => {
            warn!("Invalid metrics address {}: {}", listen_addr, e);
            return;
        }
    };

    // Ignore error if address is already in use
    if let Err(e) = PrometheusBuilder::new().with_http_listener(addr).install() {
        warn!("Failed to install Prometheus recorder: {}", e);
        return;
    }

    info!("Metrics exporter listening on {}", addr);
}
