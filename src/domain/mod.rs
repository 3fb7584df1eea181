// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：核心数据结构
/// - 仓库接口（repositories）：持久化抽象接口
/// - 服务（services）：轮询、预热和代理筛选
pub mod models;
pub mod repositories;
pub mod services;
