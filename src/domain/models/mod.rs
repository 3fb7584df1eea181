// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心数据结构，包括：
/// - 请求结果（fetch）：单次HTTP请求的三态结果
/// - 公会（guild）：公会成员及标识提取
/// - 代理（proxy）：代理探测结论和筛选状态
/// - 预热（warming）：预热目标和统计
pub mod fetch;
pub mod guild;
pub mod proxy;
pub mod warming;
