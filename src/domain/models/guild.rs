// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// 公会成员
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Member {
    /// 角色档案标识
    #[serde(rename = "profileTarget", default)]
    pub profile_target: Option<String>,
    /// 家族名
    #[serde(rename = "familyName", default)]
    pub family_name: Option<String>,
}

/// 公会数据
///
/// 只关心成员列表，缺失或为null的 `members` 视为空列表
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GuildRecord {
    #[serde(default)]
    members: Option<Vec<Member>>,
}

impl GuildRecord {
    /// 从接口返回的JSON构造公会数据
    ///
    /// 结构不符合预期时记录警告并返回空公会
    pub fn from_value(value: &Value) -> Self {
        if value.is_null() {
            return Self::default();
        }

        match serde_json::from_value(value.clone()) {
            Ok(record) => record,
            Err(e) => {
                warn!("Unexpected guild payload shape, treating as empty: {}", e);
                Self::default()
            }
        }
    }

    /// 成员列表
    pub fn members(&self) -> &[Member] {
        self.members.as_deref().unwrap_or(&[])
    }

    /// 按成员顺序返回非空的档案标识
    pub fn profile_targets(&self) -> Vec<String> {
        self.members()
            .iter()
            .filter_map(|m| m.profile_target.as_deref())
            .filter(|pt| !pt.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// 按成员顺序返回非空的家族名
    pub fn family_names(&self) -> Vec<String> {
        self.members()
            .iter()
            .filter_map(|m| m.family_name.as_deref())
            .filter(|fname| !fname.is_empty())
            .map(str::to_string)
            .collect()
    }
}
