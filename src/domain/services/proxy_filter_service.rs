// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::domain::models::proxy::{ProbeOutcome, ProxyRunStatus};
use crate::domain::repositories::list_sink::{ListSink, SinkError};
use crate::engines::traits::{CandidateSource, ProxyProbe};
use crate::infrastructure::metrics::PROXY_PROBES_TOTAL;

/// 代理筛选配置
#[derive(Debug, Clone)]
pub struct ProxyFilterConfig {
    /// 最多探测的候选数
    pub limit: usize,
    /// 两次探测之间的间隔
    pub throttle: Duration,
    /// 可用代理列表名
    pub output_name: String,
}

impl Default for ProxyFilterConfig {
    fn default() -> Self {
        Self {
            limit: 50,
            throttle: Duration::from_millis(200),
            output_name: "working_proxies.txt".to_string(),
        }
    }
}

/// 代理筛选结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    /// 候选总数
    pub candidates: usize,
    /// 实际探测数
    pub tested: usize,
    /// 可用代理，按来源顺序
    pub survivors: Vec<String>,
    /// 最终状态
    pub status: ProxyRunStatus,
}

impl FilterReport {
    fn aborted(status: ProxyRunStatus) -> Self {
        Self {
            candidates: 0,
            tested: 0,
            survivors: Vec::new(),
            status,
        }
    }
}

/// 代理筛选服务
///
/// 按来源顺序探测候选代理，探测数达到上限即停止（无论结果如何），
/// 每个候选只探测一次。
pub struct ProxyFilterService {
    probe: Arc<dyn ProxyProbe>,
    sink: Arc<dyn ListSink>,
    config: ProxyFilterConfig,
}

impl ProxyFilterService {
    pub fn new(probe: Arc<dyn ProxyProbe>, sink: Arc<dyn ListSink>, config: ProxyFilterConfig) -> Self {
        Self {
            probe,
            sink,
            config,
        }
    }

    /// 获取候选列表并筛选
    ///
    /// 来源无法获取或为空时在发出任何探测之前中止
    pub async fn run(
        &self,
        source: &dyn CandidateSource,
        source_url: &str,
    ) -> Result<FilterReport, SinkError> {
        let candidates = match source.fetch_candidates(source_url).await {
            Ok(candidates) => candidates,
            Err(e) => {
                error!("Failed to fetch proxy list from {}: {}", source_url, e);
                return Ok(FilterReport::aborted(ProxyRunStatus::SourceUnavailable));
            }
        };

        self.filter(&candidates).await
    }

    /// 筛选候选代理
    pub async fn filter(&self, candidates: &[String]) -> Result<FilterReport, SinkError> {
        if candidates.is_empty() {
            warn!("No proxies found.");
            return Ok(FilterReport::aborted(ProxyRunStatus::NoCandidates));
        }

        info!(
            "Testing up to {} of {} proxies",
            self.config.limit.min(candidates.len()),
            candidates.len()
        );

        let mut tested = 0;
        let mut survivors = Vec::new();

        for candidate in candidates {
            if tested >= self.config.limit {
                break;
            }
            tested += 1;

            let outcome = self.probe.probe(candidate).await;
            let verdict = if outcome.is_usable() { "OK" } else { "FAIL" };
            counter!(PROXY_PROBES_TOTAL, "verdict" => verdict).increment(1);

            match &outcome {
                ProbeOutcome::Usable => info!("{} -> OK", candidate),
                ProbeOutcome::Rejected(reason) => info!("{} -> FAIL ({})", candidate, reason),
                ProbeOutcome::Fault(reason) => info!("{} -> FAIL (error: {})", candidate, reason),
            }

            if outcome.is_usable() {
                survivors.push(candidate.clone());
            }

            tokio::time::sleep(self.config.throttle).await;
        }

        let status = if survivors.is_empty() {
            warn!("No working proxies found.");
            ProxyRunStatus::NoSurvivors
        } else {
            self.sink.persist(&self.config.output_name, &survivors).await?;
            info!(
                "Saved {} working proxies to {}",
                survivors.len(),
                self.config.output_name
            );
            info!("Use them like: -proxy \"{}\"", survivors.join(" "));
            ProxyRunStatus::Survivors(survivors.len())
        };

        Ok(FilterReport {
            candidates: candidates.len(),
            tested,
            survivors,
            status,
        })
    }
}
