// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 提取记录（record）：单个页面的结构化提取结果
/// - 抓取结果（scrape_result）：一个任务全部记录的聚合
/// - 任务（task）：一次抓取作业及其生命周期
pub mod record;
pub mod scrape_result;
pub mod task;
