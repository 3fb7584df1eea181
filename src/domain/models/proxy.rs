// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::fmt;

/// 检查响应体时读取的最大字节数
pub const MAX_INSPECTED_BYTES: usize = 20_000;

/// 正常页面的最小字符数，低于此值视为错误页或验证页
pub const MIN_BODY_CHARS: usize = 500;

/// 拦截页特征（小写）
pub const BLOCK_PAGE_MARKERS: &[&str] = &["imperva", "incapsula", "<iframe"];

/// 代理被判定为不可用的原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// 状态码不是200
    Status(u16),
    /// 命中拦截页特征
    BlockPage(&'static str),
    /// 响应内容过短
    ShortBody(usize),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Status(code) => write!(f, "status {}", code),
            RejectReason::BlockPage(marker) => write!(f, "block page marker {:?}", marker),
            RejectReason::ShortBody(len) => write!(f, "body too short ({} chars)", len),
        }
    }
}

/// 单次代理探测的结果
///
/// 对外只暴露布尔结论，细节仅用于日志
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// 可用
    Usable,
    /// 收到响应但判定不可用
    Rejected(RejectReason),
    /// 探测过程中出错（超时、拒绝连接、TLS等）
    Fault(String),
}

impl ProbeOutcome {
    /// 根据状态码和响应内容判定代理是否可用
    ///
    /// `body` 应当是已经截断到 [`MAX_INSPECTED_BYTES`] 的解码文本
    pub fn classify(status_code: u16, body: &str) -> Self {
        if status_code != 200 {
            return ProbeOutcome::Rejected(RejectReason::Status(status_code));
        }

        let lowered = body.to_lowercase();
        if let Some(marker) = BLOCK_PAGE_MARKERS.iter().find(|m| lowered.contains(*m)) {
            return ProbeOutcome::Rejected(RejectReason::BlockPage(marker));
        }

        let chars = body.chars().count();
        if chars <= MIN_BODY_CHARS {
            return ProbeOutcome::Rejected(RejectReason::ShortBody(chars));
        }

        ProbeOutcome::Usable
    }

    /// 布尔结论
    pub fn is_usable(&self) -> bool {
        matches!(self, ProbeOutcome::Usable)
    }
}

/// 代理筛选的最终状态，对应进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyRunStatus {
    /// 找到可用代理
    Survivors(usize),
    /// 来源列表为空
    NoCandidates,
    /// 没有可用代理
    NoSurvivors,
    /// 来源无法获取
    SourceUnavailable,
}

impl ProxyRunStatus {
    /// 进程退出码
    pub fn exit_code(&self) -> u8 {
        match self {
            ProxyRunStatus::Survivors(_) => 0,
            ProxyRunStatus::NoCandidates => 1,
            ProxyRunStatus::NoSurvivors => 2,
            ProxyRunStatus::SourceUnavailable => 3,
        }
    }
}

/// 将 `host:port` 形式的候选补全为代理URL
pub fn proxy_url(candidate: &str) -> String {
    if candidate.contains("://") {
        candidate.to_string()
    } else {
        format!("http://{}", candidate)
    }
}
