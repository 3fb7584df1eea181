// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::domain::models::guild::GuildRecord;
use crate::domain::models::warming::{PrewarmSummary, RosterCollection, WarmTarget, WarmingReport};
use crate::domain::repositories::list_sink::{ListSink, SinkError};
use crate::domain::services::polling_service::PollingService;
use crate::infrastructure::metrics::IDENTIFIERS_FAILED_TOTAL;
use crate::utils::dedup::unique_in_order;
use crate::utils::url_utils::build_endpoint_url;
use crate::utils::validators::is_valid_search_query;

/// 预热配置
#[derive(Debug, Clone)]
pub struct WarmingConfig {
    /// 缓存接口地址
    pub base_url: String,
    /// 区域代码
    pub region: String,
    /// 每次请求之后的固定间隔
    pub throttle: Duration,
    /// 是否预热搜索接口
    pub warm_search: bool,
    /// 档案失败列表名
    pub failed_profiles_name: String,
    /// 搜索失败列表名
    pub failed_searches_name: String,
}

impl Default for WarmingConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            region: "EU".to_string(),
            throttle: Duration::from_millis(200),
            warm_search: false,
            failed_profiles_name: "failed_profiles.txt".to_string(),
            failed_searches_name: "failed_searches.txt".to_string(),
        }
    }
}

/// 缓存预热服务
///
/// 先获取所有公会并收集成员标识，去重后逐个轮询档案接口，
/// 可选地再轮询家族名搜索接口。所有请求严格串行。
pub struct WarmingService {
    poller: PollingService,
    sink: Arc<dyn ListSink>,
    config: WarmingConfig,
}

impl WarmingService {
    pub fn new(poller: PollingService, sink: Arc<dyn ListSink>, config: WarmingConfig) -> Self {
        Self {
            poller,
            sink,
            config,
        }
    }

    /// 执行完整预热
    ///
    /// # 参数
    ///
    /// * `guilds` - 公会名称列表
    ///
    /// # 返回值
    ///
    /// * `Ok(PrewarmSummary)` - 各阶段统计
    /// * `Err(SinkError)` - 失败列表保存失败
    pub async fn run(&self, guilds: &[String]) -> Result<PrewarmSummary, SinkError> {
        let roster = self.collect_roster(guilds).await;

        let profiles = self
            .warm(WarmTarget::Profiles, &roster.profile_targets)
            .await?;

        let searches = if self.config.warm_search {
            Some(self.warm(WarmTarget::Searches, &roster.family_names).await?)
        } else {
            None
        };

        Ok(PrewarmSummary {
            roster,
            profiles,
            searches,
        })
    }

    /// 获取所有公会并收集成员标识（保留重复）
    ///
    /// 没有返回数据（或返回空对象/空数组）的公会被跳过
    pub async fn collect_roster(&self, guilds: &[String]) -> RosterCollection {
        let mut roster = RosterCollection::default();

        for guild in guilds {
            let url = build_endpoint_url(
                &self.config.base_url,
                "/v1/guild",
                &[("guildName", guild.as_str()), ("region", self.config.region.as_str())],
            );
            info!("Fetching guild: {}", guild);

            let body = self
                .poller
                .poll(&url, &format!("guild:{}", guild))
                .await
                .filter(|body| !is_blank(body));

            let Some(body) = body else {
                warn!("Skipping guild {}: no data", guild);
                roster.guilds_failed.push(guild.clone());
                continue;
            };

            let record = GuildRecord::from_value(&body);
            let profile_targets = record.profile_targets();
            info!("  members: {}", profile_targets.len());

            roster.guilds_fetched += 1;
            roster.profile_targets.extend(profile_targets);
            roster.family_names.extend(record.family_names());

            // only successful guild fetches are throttled
            tokio::time::sleep(self.config.throttle).await;
        }

        roster
    }

    /// 对一组标识执行预热
    ///
    /// 标识先去重；搜索目标会跳过不合法的关键字（不计入失败）。
    /// 每个标识请求后都会等待固定间隔，失败列表非空时在结束时保存。
    pub async fn warm(
        &self,
        target: WarmTarget,
        identifiers: &[String],
    ) -> Result<WarmingReport, SinkError> {
        let unique = unique_in_order(identifiers.iter().map(String::as_str));
        let total = unique.len();
        match target {
            WarmTarget::Profiles => info!("Total unique profiles: {}", total),
            WarmTarget::Searches => info!("Total unique family names: {}", total),
        }

        let mut report = WarmingReport::new(target, total);

        for (idx, identifier) in unique.iter().enumerate() {
            if target.requires_query_validation() && !is_valid_search_query(identifier) {
                debug!("Skipping invalid search query: {:?}", identifier);
                report.skipped += 1;
                continue;
            }

            let url = build_endpoint_url(
                &self.config.base_url,
                target.path(),
                &target.query_params(identifier, &self.config.region),
            );
            let label = format!("{}:{}/{}", target.label_prefix(), idx + 1, total);
            info!("Fetching {}", label);

            report.attempted += 1;
            if self.poller.poll(&url, &label).await.is_none() {
                counter!(IDENTIFIERS_FAILED_TOTAL, "kind" => target.as_str()).increment(1);
                report.failures.push(identifier.clone());
            }

            tokio::time::sleep(self.config.throttle).await;
        }

        if !report.failures.is_empty() {
            let name = self.failure_list_name(target);
            self.sink.persist(name, &report.failures).await?;
            warn!(
                "Failed {}: {} (saved to {})",
                target.as_str(),
                report.failures.len(),
                name
            );
        }

        info!(
            "Warmed {}: {} ok, {} failed, {} skipped",
            target.as_str(),
            report.succeeded(),
            report.failures.len(),
            report.skipped
        );

        Ok(report)
    }

    fn failure_list_name(&self, target: WarmTarget) -> &str {
        match target {
            WarmTarget::Profiles => &self.config.failed_profiles_name,
            WarmTarget::Searches => &self.config.failed_searches_name,
        }
    }
}

fn is_blank(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}
