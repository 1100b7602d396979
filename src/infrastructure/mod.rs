// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，负责与外部系统的交互。
///
/// 包含的子模块：
/// - 数据库（database）：连接池、迁移与实体映射
/// - 指标（metrics）：Prometheus指标导出
/// - PDF输出（pdf_writer）：将报告排版编码为PDF
/// - 仓库实现（repositories）：领域仓库接口的具体实现
/// - 存储（storage）：本地报告文件存储
///
/// 基础设施层依赖于领域层的抽象接口，领域层不依赖于这里的任何实现。
pub mod database;
pub mod metrics;
pub mod pdf_writer;
pub mod repositories;
pub mod storage;
