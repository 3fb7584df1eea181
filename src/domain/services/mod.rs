// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - 轮询服务（polling_service）：按状态分类退避，直到缓存返回结果
/// - 预热服务（warming_service）：收集公会成员并预热档案和搜索接口
/// - 代理筛选服务（proxy_filter_service）：探测候选代理并保存可用列表
pub mod polling_service;
pub mod proxy_filter_service;
pub mod warming_service;
