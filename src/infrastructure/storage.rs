// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::domain::repositories::list_sink::{ListSink, SinkError};

fn encode_lines(entries: &[String]) -> String {
    let mut content = String::new();
    for entry in entries {
        content.push_str(entry);
        content.push('\n');
    }
    content
}

/// 本地文件系统存储实现
///
/// 列表名即文件名（相对于基础目录），UTF-8 编码，每行一个条目
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// 列表对应的完整路径
    pub fn full_path(&self, name: &str) -> PathBuf {
        self.base_path.join(name)
    }
}

#[async_trait]
impl ListSink for LocalStorage {
    async fn persist(&self, name: &str, entries: &[String]) -> Result<(), SinkError> {
        let full_path = self.full_path(name);

        // 确保目录存在
        if let Some(parent) = Path::new(&full_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(encode_lines(entries).as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<String>>, SinkError> {
        let full_path = self.full_path(name);

        match fs::read_to_string(&full_path).await {
            Ok(content) => Ok(Some(
                content
                    .lines()
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(SinkError::Io(e)),
        }
    }
}

/// 测试用的内存存储实现
#[derive(Clone, Default)]
pub struct InMemoryStorage {
    data: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 已保存的列表名
    pub async fn names(&self) -> Vec<String> {
        let map = self.data.read().await;
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }
}

#[async_trait]
impl ListSink for InMemoryStorage {
    async fn persist(&self, name: &str, entries: &[String]) -> Result<(), SinkError> {
        let mut map = self.data.write().await;
        map.insert(name.to_string(), entries.to_vec());
        Ok(())
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<String>>, SinkError> {
        let map = self.data.read().await;
        Ok(map.get(name).cloned())
    }
}
