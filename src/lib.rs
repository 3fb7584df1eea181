// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 分层加载默认值、配置文件和 `BDO_PREWARM__` 环境变量
pub mod config;

/// 领域模块
///
/// 包含核心数据结构、服务和仓库接口
pub mod domain;

/// 引擎模块
///
/// 实现JSON请求、代理列表下载和代理探测
pub mod engines;

/// 基础设施模块
///
/// 提供列表持久化和指标导出
pub mod infrastructure;

/// 工具模块
///
/// 退避策略、关键字校验、去重和日志初始化
pub mod utils;
