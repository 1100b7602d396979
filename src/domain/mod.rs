// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心业务逻辑，包括：
/// - 领域模型（models）：任务、提取记录与任务结果
/// - 仓库接口（repositories）：数据持久化与报告存储的抽象接口
/// - 服务（services）：URL发现、分页、字段提取与报告渲染
///
/// 领域层不依赖于任何外部实现，抓取与存储均通过特质注入。
pub mod models;
pub mod repositories;
pub mod services;
