// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了领域层的仓库接口，遵循依赖倒置原则。
/// 具体实现由基础设施层提供。
///
/// 包含的仓库接口：
/// - 抓取结果仓库（scrape_result_repository）：管理任务聚合结果的存储
/// - 报告存储（storage_repository）：管理报告文件
/// - 任务仓库（task_repository）：管理任务的创建、领取与状态
pub mod scrape_result_repository;
pub mod storage_repository;
pub mod task_repository;
