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

use crate::domain::models::proxy::{proxy_url, ProbeOutcome, MAX_INSPECTED_BYTES};
use crate::engines::traits::{EngineError, ProxyProbe};
use async_trait::async_trait;
use std::time::Duration;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// 代理探测引擎
///
/// 通过候选代理（HTTP/HTTPS 正向代理）请求目标页面，
/// 根据状态码、拦截页特征和内容长度判断代理是否可用
pub struct HttpProxyProbe {
    target_url: String,
    timeout: Duration,
}

impl HttpProxyProbe {
    pub fn new(target_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            target_url: target_url.into(),
            timeout,
        }
    }

    async fn try_probe(&self, candidate: &str) -> Result<ProbeOutcome, EngineError> {
        let proxy = reqwest::Proxy::all(proxy_url(candidate))
            .map_err(|e| EngineError::Other(format!("Invalid proxy: {}", e)))?;

        // Each candidate gets a fresh client
        let client = reqwest::Client::builder()
            .user_agent(BROWSER_USER_AGENT)
            .timeout(self.timeout)
            .proxy(proxy)
            .build()?;

        let mut response = client.get(&self.target_url).send().await?;
        let status_code = response.status().as_u16();

        let mut buf: Vec<u8> = Vec::with_capacity(MAX_INSPECTED_BYTES);
        while buf.len() < MAX_INSPECTED_BYTES {
            match response.chunk().await? {
                Some(chunk) => buf.extend_from_slice(&chunk),
                None => break,
            }
        }
        buf.truncate(MAX_INSPECTED_BYTES);

        let body = String::from_utf8_lossy(&buf);
        Ok(ProbeOutcome::classify(status_code, &body))
    }
}

#[async_trait]
impl ProxyProbe for HttpProxyProbe {
    async fn probe(&self, candidate: &str) -> ProbeOutcome {
        match self.try_probe(candidate).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_timeout() => ProbeOutcome::Fault("timeout".to_string()),
            Err(e) => ProbeOutcome::Fault(e.to_string()),
        }
    }
}

#[cfg(test)]
#[path = "proxy_engine_test.rs"]
mod tests;
