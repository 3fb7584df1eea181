// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde_json::Value;

/// 单次HTTP请求的结果
///
/// 连接层面的失败统一归一为状态码 0，不会以错误形式返回
#[derive(Debug, Clone, PartialEq)]
pub struct FetchOutcome {
    /// HTTP状态码，0 表示没有收到任何响应
    pub status_code: u16,
    /// 解析后的JSON内容，空响应或解析失败时为None
    pub body: Option<Value>,
    /// 原始响应文本
    pub raw_text: String,
}

impl FetchOutcome {
    /// 连接失败时使用的状态码
    pub const TRANSPORT_FAILURE: u16 = 0;

    /// 连接失败（DNS、连接、超时、TLS）
    pub fn transport_failure() -> Self {
        Self {
            status_code: Self::TRANSPORT_FAILURE,
            body: None,
            raw_text: String::new(),
        }
    }

    /// 根据收到的响应构造结果
    ///
    /// 非空且能解析为JSON的内容会放入 `body`，否则 `body` 为None
    pub fn from_payload(status_code: u16, raw_text: String) -> Self {
        let body = if raw_text.is_empty() {
            None
        } else {
            serde_json::from_str(&raw_text).ok()
        };

        Self {
            status_code,
            body,
            raw_text,
        }
    }

    /// 是否为连接失败
    pub fn is_transport_failure(&self) -> bool {
        self.status_code == Self::TRANSPORT_FAILURE
    }
}
