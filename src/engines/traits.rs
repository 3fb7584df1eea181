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

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::models::fetch::FetchOutcome;
use crate::domain::models::proxy::ProbeOutcome;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("Unexpected status: {0}")]
    Status(u16),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

impl EngineError {
    /// 判断是否为超时
    pub fn is_timeout(&self) -> bool {
        match self {
            EngineError::RequestFailed(e) => e.is_timeout(),
            _ => false,
        }
    }
}

/// JSON请求特质
///
/// 每次调用发出一个GET请求，连接失败归一为状态码 0
#[async_trait]
pub trait JsonFetcher: Send + Sync {
    /// 请求并尝试解析JSON
    async fn fetch_json(&self, url: &str) -> FetchOutcome;
}

/// 代理来源特质
#[async_trait]
pub trait CandidateSource: Send + Sync {
    /// 获取候选代理列表（按来源顺序，不去重）
    async fn fetch_candidates(&self, url: &str) -> Result<Vec<String>, EngineError>;
}

/// 代理探测特质
#[async_trait]
pub trait ProxyProbe: Send + Sync {
    /// 通过候选代理发出一次探测请求
    ///
    /// 任何错误都折叠为 [`ProbeOutcome::Fault`]
    async fn probe(&self, candidate: &str) -> ProbeOutcome;
}
