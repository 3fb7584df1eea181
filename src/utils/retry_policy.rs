// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;

/// 轮询状态分类
///
/// 根据缓存接口返回的状态码决定下一步动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusClass {
    /// 200，结果已就绪
    Ready,
    /// 202，上游仍在计算
    Computing,
    /// 429，被限流
    RateLimited,
    /// 500/503 或连接失败
    ServerFault,
    /// 其他状态码
    Unexpected,
}

impl StatusClass {
    /// 对状态码进行分类，0 表示连接失败
    pub fn from_status(status_code: u16) -> Self {
        match status_code {
            200 => StatusClass::Ready,
            202 => StatusClass::Computing,
            429 => StatusClass::RateLimited,
            0 | 500 | 503 => StatusClass::ServerFault,
            _ => StatusClass::Unexpected,
        }
    }

    /// 指标标签
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusClass::Ready => "ready",
            StatusClass::Computing => "computing",
            StatusClass::RateLimited => "rate_limited",
            StatusClass::ServerFault => "server_fault",
            StatusClass::Unexpected => "unexpected",
        }
    }
}

/// 退避策略配置
///
/// 每种失败类型使用固定的倍数和下限，不做指数增长
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    /// 基础等待时间
    pub base_delay: Duration,
    /// 限流时的最短等待时间
    pub rate_limit_floor: Duration,
    /// 限流时的基础等待倍数
    pub rate_limit_multiplier: f64,
    /// 服务端故障时的最短等待时间
    pub server_fault_floor: Duration,
    /// 服务端故障时的基础等待倍数
    pub server_fault_multiplier: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::with_base_delay(Duration::from_secs(2))
    }
}

impl BackoffPolicy {
    /// 使用指定的基础等待时间创建策略
    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            rate_limit_floor: Duration::from_secs(5),
            rate_limit_multiplier: 2.0,
            server_fault_floor: Duration::from_secs(10),
            server_fault_multiplier: 5.0,
        }
    }

    /// 计算某类状态之后的等待时间
    ///
    /// `Ready` 不需要等待，返回零
    pub fn delay_for(&self, class: StatusClass) -> Duration {
        match class {
            StatusClass::Ready => Duration::ZERO,
            StatusClass::Computing | StatusClass::Unexpected => self.base_delay,
            StatusClass::RateLimited => self
                .rate_limit_floor
                .max(self.base_delay.mul_f64(self.rate_limit_multiplier)),
            StatusClass::ServerFault => self
                .server_fault_floor
                .max(self.base_delay.mul_f64(self.server_fault_multiplier)),
        }
    }

    /// 单个地址最坏情况下的总等待时间
    ///
    /// 每次非200尝试之后都会等待，包括最后一次
    pub fn worst_case_wait(&self, max_attempts: u32) -> Duration {
        let longest = [
            StatusClass::Computing,
            StatusClass::RateLimited,
            StatusClass::ServerFault,
        ]
        .into_iter()
        .map(|class| self.delay_for(class))
        .max()
        .unwrap_or(self.base_delay);

        longest * max_attempts
    }
}
