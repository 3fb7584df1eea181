// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 预热目标
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarmTarget {
    /// 角色档案 `/v1/adventurer`
    Profiles,
    /// 家族名搜索 `/v1/adventurer/search`
    Searches,
}

impl WarmTarget {
    /// 接口路径
    pub fn path(&self) -> &'static str {
        match self {
            WarmTarget::Profiles => "/v1/adventurer",
            WarmTarget::Searches => "/v1/adventurer/search",
        }
    }

    /// 日志标签前缀
    pub fn label_prefix(&self) -> &'static str {
        match self {
            WarmTarget::Profiles => "adventurer",
            WarmTarget::Searches => "search",
        }
    }

    /// 指标标签
    pub fn as_str(&self) -> &'static str {
        match self {
            WarmTarget::Profiles => "profiles",
            WarmTarget::Searches => "searches",
        }
    }

    /// 发起请求前是否需要校验关键字
    pub fn requires_query_validation(&self) -> bool {
        matches!(self, WarmTarget::Searches)
    }

    /// 构造请求参数，顺序与接口文档一致
    pub fn query_params<'a>(&self, identifier: &'a str, region: &'a str) -> Vec<(&'static str, &'a str)> {
        match self {
            WarmTarget::Profiles => vec![("profileTarget", identifier), ("region", region)],
            WarmTarget::Searches => vec![
                ("query", identifier),
                ("searchType", "familyName"),
                ("region", region),
            ],
        }
    }
}

/// 从公会列表中收集到的标识（含重复）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterCollection {
    /// 成功获取的公会数
    pub guilds_fetched: usize,
    /// 获取失败的公会
    pub guilds_failed: Vec<String>,
    /// 档案标识
    pub profile_targets: Vec<String>,
    /// 家族名
    pub family_names: Vec<String>,
}

/// 单轮预热的统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarmingReport {
    /// 预热目标
    pub target: WarmTarget,
    /// 去重后的标识数
    pub unique: usize,
    /// 实际发出请求的标识数
    pub attempted: usize,
    /// 校验未通过而跳过的标识数
    pub skipped: usize,
    /// 轮询失败的标识，按出现顺序
    pub failures: Vec<String>,
}

impl WarmingReport {
    pub fn new(target: WarmTarget, unique: usize) -> Self {
        Self {
            target,
            unique,
            attempted: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn succeeded(&self) -> usize {
        self.attempted - self.failures.len()
    }
}

/// 一次完整预热的汇总
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrewarmSummary {
    pub roster: RosterCollection,
    pub profiles: WarmingReport,
    /// 未开启搜索预热时为None
    pub searches: Option<WarmingReport>,
}
