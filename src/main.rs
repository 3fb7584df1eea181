// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use bdo_prewarm::config::settings::Settings;
use bdo_prewarm::domain::services::polling_service::PollingService;
use bdo_prewarm::domain::services::proxy_filter_service::{ProxyFilterConfig, ProxyFilterService};
use bdo_prewarm::domain::services::warming_service::{WarmingConfig, WarmingService};
use bdo_prewarm::engines::proxy_engine::HttpProxyProbe;
use bdo_prewarm::engines::reqwest_engine::ReqwestFetcher;
use bdo_prewarm::infrastructure::metrics;
use bdo_prewarm::infrastructure::storage::LocalStorage;
use bdo_prewarm::utils::retry_policy::BackoffPolicy;
use bdo_prewarm::utils::telemetry;
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::info;

/// BDO REST API 缓存预热和代理筛选工具
#[derive(Parser)]
#[command(name = "bdo-prewarm", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Prewarm the cache for guild members
    Warm(WarmArgs),
    /// Fetch and filter HTTPS proxies
    Proxies(ProxyArgs),
}

#[derive(Args)]
struct WarmArgs {
    /// API base URL
    #[arg(long)]
    base_url: Option<String>,
    /// Region code
    #[arg(long)]
    region: Option<String>,
    /// Delay between retries in seconds
    #[arg(long)]
    delay: Option<f64>,
    /// Max poll attempts per request
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Delay between requests in seconds
    #[arg(long)]
    throttle: Option<f64>,
    /// Also warm the family-name search cache
    #[arg(long)]
    warm_search: bool,
    /// Guild to warm (repeatable, replaces the configured roster)
    #[arg(long = "guild")]
    guilds: Vec<String>,
}

#[derive(Args)]
struct ProxyArgs {
    /// Proxy list URL
    #[arg(long)]
    source_url: Option<String>,
    /// URL to test proxies against
    #[arg(long)]
    test_url: Option<String>,
    /// Max proxies to test
    #[arg(long)]
    limit: Option<usize>,
    /// Per-proxy timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,
    /// Delay between tests in seconds
    #[arg(long)]
    sleep: Option<f64>,
    /// Output file
    #[arg(long)]
    out: Option<String>,
}

impl WarmArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(base_url) = self.base_url {
            settings.api.base_url = base_url;
        }
        if let Some(region) = self.region {
            settings.api.region = region;
        }
        if let Some(delay) = self.delay {
            settings.warming.poll_delay_secs = delay;
        }
        if let Some(max_attempts) = self.max_attempts {
            settings.warming.max_attempts = max_attempts;
        }
        if let Some(throttle) = self.throttle {
            settings.warming.throttle_secs = throttle;
        }
        if self.warm_search {
            settings.warming.warm_search = true;
        }
        if !self.guilds.is_empty() {
            settings.warming.guilds = self.guilds;
        }
    }
}

impl ProxyArgs {
    fn apply(self, settings: &mut Settings) {
        if let Some(source_url) = self.source_url {
            settings.proxy.source_url = source_url;
        }
        if let Some(test_url) = self.test_url {
            settings.proxy.test_url = test_url;
        }
        if let Some(limit) = self.limit {
            settings.proxy.limit = limit;
        }
        if let Some(timeout) = self.timeout {
            settings.proxy.timeout_secs = timeout;
        }
        if let Some(sleep) = self.sleep {
            settings.proxy.throttle_secs = sleep;
        }
        if let Some(out) = self.out {
            settings.proxy.output_path = out;
        }
    }
}

/// 主函数
///
/// 单线程运行时，所有请求严格串行
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    telemetry::init_telemetry();
    let cli = Cli::parse();

    let mut settings = Settings::new()?;
    metrics::init_metrics(settings.metrics.listen_addr.as_deref());

    match cli.command {
        Command::Warm(args) => {
            args.apply(&mut settings);
            run_warm(&settings).await
        }
        Command::Proxies(args) => {
            args.apply(&mut settings);
            run_proxies(&settings).await
        }
    }
}

async fn run_warm(settings: &Settings) -> anyhow::Result<ExitCode> {
    info!(
        "Prewarming {} guilds against {} ({})",
        settings.warming.guilds.len(),
        settings.api.base_url,
        settings.api.region
    );

    let policy = BackoffPolicy::with_base_delay(settings.warming.poll_delay());
    info!(
        "Up to {} attempts per request, worst-case backoff {:?}",
        settings.warming.max_attempts,
        policy.worst_case_wait(settings.warming.max_attempts)
    );

    let fetcher = Arc::new(ReqwestFetcher::new(settings.api.request_timeout())?);
    let poller = PollingService::new(fetcher, policy, settings.warming.max_attempts);
    let sink = Arc::new(LocalStorage::new(&settings.warming.output_dir));
    let config = WarmingConfig {
        base_url: settings.api.base_url.clone(),
        region: settings.api.region.clone(),
        throttle: settings.warming.throttle(),
        warm_search: settings.warming.warm_search,
        failed_profiles_name: settings.warming.failed_profiles_file.clone(),
        failed_searches_name: settings.warming.failed_searches_file.clone(),
    };

    let summary = WarmingService::new(poller, sink, config)
        .run(&settings.warming.guilds)
        .await?;

    info!(
        "Done: {}/{} guilds, {} profiles warmed, {} failed",
        summary.roster.guilds_fetched,
        settings.warming.guilds.len(),
        summary.profiles.succeeded(),
        summary.profiles.failures.len()
    );
    if let Some(searches) = &summary.searches {
        info!(
            "Searches: {} warmed, {} failed, {} skipped",
            searches.succeeded(),
            searches.failures.len(),
            searches.skipped
        );
    }

    // partial failures are reported through the failure lists only
    Ok(ExitCode::SUCCESS)
}

async fn run_proxies(settings: &Settings) -> anyhow::Result<ExitCode> {
    let source = ReqwestFetcher::new(settings.proxy.source_timeout())?;
    let probe = Arc::new(HttpProxyProbe::new(
        settings.proxy.test_url.clone(),
        settings.proxy.timeout(),
    ));
    let sink = Arc::new(LocalStorage::new("."));
    let config = ProxyFilterConfig {
        limit: settings.proxy.limit,
        throttle: settings.proxy.throttle(),
        output_name: settings.proxy.output_path.clone(),
    };

    let report = ProxyFilterService::new(probe, sink, config)
        .run(&source, &settings.proxy.source_url)
        .await?;

    info!(
        "Tested {} of {} proxies, {} working",
        report.tested,
        report.candidates,
        report.survivors.len()
    );

    Ok(ExitCode::from(report.status.exit_code()))
}
