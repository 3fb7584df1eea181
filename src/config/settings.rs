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

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;
use std::time::Duration;

/// 应用程序配置设置
///
/// 包含缓存接口、预热、代理筛选和指标等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 缓存接口配置
    pub api: ApiSettings,
    /// 预热配置
    pub warming: WarmingSettings,
    /// 代理筛选配置
    pub proxy: ProxySettings,
    /// 指标配置
    #[serde(default)]
    pub metrics: MetricsSettings,
}

/// 缓存接口配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
    /// 接口基础地址
    pub base_url: String,
    /// 区域代码
    pub region: String,
    /// 单次请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 预热配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct WarmingSettings {
    /// 轮询基础间隔（秒）
    pub poll_delay_secs: f64,
    /// 每个地址的最大尝试次数
    pub max_attempts: u32,
    /// 请求之间的固定间隔（秒）
    pub throttle_secs: f64,
    /// 是否同时预热搜索接口
    pub warm_search: bool,
    /// 公会列表
    pub guilds: Vec<String>,
    /// 失败列表输出目录
    pub output_dir: String,
    /// 档案失败列表文件名
    pub failed_profiles_file: String,
    /// 搜索失败列表文件名
    pub failed_searches_file: String,
}

/// 代理筛选配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ProxySettings {
    /// 代理列表地址
    pub source_url: String,
    /// 代理列表下载超时时间（秒）
    pub source_timeout_secs: u64,
    /// 探测目标地址
    pub test_url: String,
    /// 最多探测的代理数
    pub limit: usize,
    /// 单次探测超时时间（秒）
    pub timeout_secs: u64,
    /// 探测之间的间隔（秒）
    pub throttle_secs: f64,
    /// 可用代理输出文件
    pub output_path: String,
}

/// 指标配置设置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MetricsSettings {
    /// Prometheus 导出器监听地址，未设置时不启用
    pub listen_addr: Option<String>,
}

impl WarmingSettings {
    pub fn poll_delay(&self) -> Duration {
        secs(self.poll_delay_secs)
    }

    pub fn throttle(&self) -> Duration {
        secs(self.throttle_secs)
    }
}

impl ProxySettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs)
    }

    pub fn throttle(&self) -> Duration {
        secs(self.throttle_secs)
    }
}

impl ApiSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

// negative or NaN values clamp to zero
fn secs(value: f64) -> Duration {
    Duration::try_from_secs_f64(value).unwrap_or(Duration::ZERO)
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次加载默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 和 `BDO_PREWARM__` 前缀的环境变量
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("BDO_PREWARM")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("warming.guilds")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// 只包含默认值的配置构建器
    pub fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            // Default API settings
            .set_default("api.base_url", "http://localhost:8001")?
            .set_default("api.region", "EU")?
            .set_default("api.request_timeout_secs", 30)?
            // Default warming settings
            .set_default("warming.poll_delay_secs", 2.0)?
            .set_default("warming.max_attempts", 20)?
            .set_default("warming.throttle_secs", 0.2)?
            .set_default("warming.warm_search", false)?
            .set_default("warming.guilds", Vec::<String>::new())?
            .set_default("warming.output_dir", ".")?
            .set_default("warming.failed_profiles_file", "failed_profiles.txt")?
            .set_default("warming.failed_searches_file", "failed_searches.txt")?
            // Default proxy settings
            .set_default(
                "proxy.source_url",
                "https://raw.githubusercontent.com/fyvri/fresh-proxy-list/archive/storage/classic/https.txt",
            )?
            .set_default("proxy.source_timeout_secs", 30)?
            .set_default(
                "proxy.test_url",
                "https://www.naeu.playblackdesert.com/en-US/Adventure/Guild",
            )?
            .set_default("proxy.limit", 50)?
            .set_default("proxy.timeout_secs", 8)?
            .set_default("proxy.throttle_secs", 0.2)?
            .set_default("proxy.output_path", "working_proxies.txt")
    }
}
