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

use crate::domain::models::fetch::FetchOutcome;
use crate::engines::traits::{CandidateSource, EngineError, JsonFetcher};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// 默认User-Agent
pub const USER_AGENT: &str = concat!("bdo-prewarm/", env!("CARGO_PKG_VERSION"));

/// 请求引擎
///
/// 基于reqwest实现的JSON请求引擎，也用于下载代理列表
pub struct ReqwestFetcher {
    client: reqwest::Client,
}

impl ReqwestFetcher {
    /// 创建请求引擎
    ///
    /// # 参数
    ///
    /// * `timeout` - 单次请求的超时时间
    pub fn new(timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .no_proxy()
            .build()?;

        Ok(Self { client })
    }

    /// 下载按行分隔的文本列表
    ///
    /// 无法解码的字节会被替换，每行去掉首尾空白，空行被丢弃，不做去重
    ///
    /// # 返回值
    ///
    /// * `Ok(Vec<String>)` - 列表内容
    /// * `Err(EngineError)` - 请求失败或状态码不是2xx
    pub async fn fetch_lines(&self, url: &str) -> Result<Vec<String>, EngineError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;
        Ok(parse_lines(&String::from_utf8_lossy(&bytes)))
    }
}

/// 拆分文本列表
pub fn parse_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl JsonFetcher for ReqwestFetcher {
    /// 执行GET请求
    ///
    /// 没有收到响应时返回状态码 0；收到任何响应（包括4xx/5xx）时
    /// 返回实际状态码和原始文本，并尝试解析JSON
    async fn fetch_json(&self, url: &str) -> FetchOutcome {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("Transport failure for {}: {}", url, e);
                return FetchOutcome::transport_failure();
            }
        };

        let status_code = response.status().as_u16();

        match response.text().await {
            Ok(raw_text) => FetchOutcome::from_payload(status_code, raw_text),
            Err(e) => {
                debug!("Failed to read body from {} ({}): {}", url, status_code, e);
                FetchOutcome::from_payload(status_code, String::new())
            }
        }
    }
}

#[async_trait]
impl CandidateSource for ReqwestFetcher {
    async fn fetch_candidates(&self, url: &str) -> Result<Vec<String>, EngineError> {
        self.fetch_lines(url).await
    }
}

#[cfg(test)]
#[path = "reqwest_engine_test.rs"]
mod tests;
