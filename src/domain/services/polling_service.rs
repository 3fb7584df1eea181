// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::counter;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::domain::models::fetch::FetchOutcome;
use crate::engines::traits::JsonFetcher;
use crate::infrastructure::metrics::POLL_ATTEMPTS_TOTAL;
use crate::utils::retry_policy::{BackoffPolicy, StatusClass};

/// 轮询服务
///
/// 把缓存接口的异步"计算中"信号转换为有上限的同步等待：
/// 反复请求同一URL直到返回200，或达到最大尝试次数。
/// 每次失败后的等待时间由状态分类决定，见 [`BackoffPolicy`]。
pub struct PollingService {
    fetcher: Arc<dyn JsonFetcher>,
    policy: BackoffPolicy,
    max_attempts: u32,
}

impl PollingService {
    pub fn new(fetcher: Arc<dyn JsonFetcher>, policy: BackoffPolicy, max_attempts: u32) -> Self {
        Self {
            fetcher,
            policy,
            max_attempts,
        }
    }

    /// 轮询直到结果就绪
    ///
    /// # 参数
    ///
    /// * `url` - 完整的请求地址
    /// * `label` - 日志标签，例如 `adventurer:3/120`
    ///
    /// # 返回值
    ///
    /// * `Some(Value)` - 收到200且响应体是合法JSON
    /// * `None` - 尝试次数用尽，或200的响应体为空/无法解析（不再重试）
    pub async fn poll(&self, url: &str, label: &str) -> Option<Value> {
        let max_attempts = self.max_attempts;
        let mut last_status = FetchOutcome::TRANSPORT_FAILURE;

        for attempt in 1..=max_attempts {
            let outcome = self.fetcher.fetch_json(url).await;
            last_status = outcome.status_code;

            let class = StatusClass::from_status(outcome.status_code);
            counter!(POLL_ATTEMPTS_TOTAL, "class" => class.as_str()).increment(1);

            match class {
                StatusClass::Ready => {
                    if outcome.body.is_none() {
                        warn!(label, attempt, "[{}] 200 without a JSON body", label);
                    }
                    return outcome.body;
                }
                StatusClass::Computing => {
                    info!(label, attempt, max_attempts, "[{}] 202 (in progress) attempt {}/{}", label, attempt, max_attempts);
                }
                StatusClass::RateLimited => {
                    warn!(label, attempt, max_attempts, "[{}] 429 (rate limited) attempt {}/{}", label, attempt, max_attempts);
                }
                StatusClass::ServerFault => {
                    let code = if outcome.is_transport_failure() {
                        "no connection".to_string()
                    } else {
                        outcome.status_code.to_string()
                    };
                    warn!(label, attempt, max_attempts, "[{}] {} (server/backoff) attempt {}/{}", label, code, attempt, max_attempts);
                }
                StatusClass::Unexpected => {
                    let msg = outcome.raw_text.trim();
                    let extra = if msg.is_empty() {
                        String::new()
                    } else {
                        format!(" body={}", msg)
                    };
                    warn!(
                        label,
                        attempt,
                        max_attempts,
                        status = outcome.status_code,
                        "[{}] unexpected status {}{}; retrying ({}/{})",
                        label,
                        outcome.status_code,
                        extra,
                        attempt,
                        max_attempts
                    );
                }
            }

            // every non-200 attempt sleeps, the last one included
            tokio::time::sleep(self.policy.delay_for(class)).await;
        }

        let hint = if last_status == FetchOutcome::TRANSPORT_FAILURE {
            " (connection failed?)"
        } else {
            ""
        };
        error!(label, max_attempts, "[{}] failed after {} attempts{}", label, max_attempts, hint);
        None
    }
}
