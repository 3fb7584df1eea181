// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;

/// 存储错误类型
#[derive(Error, Debug)]
pub enum SinkError {
    /// IO错误
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// 列表存储特质
///
/// 流水线结束时用于保存失败列表或可用代理列表，
/// 每个条目占一行
#[async_trait]
pub trait ListSink: Send + Sync {
    /// 以指定名称保存列表，覆盖已有内容
    async fn persist(&self, name: &str, entries: &[String]) -> Result<(), SinkError>;

    /// 读取已保存的列表
    async fn load(&self, name: &str) -> Result<Option<Vec<String>>, SinkError>;
}
