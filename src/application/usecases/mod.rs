// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用用例模块
///
/// 负责协调领域对象完成任务接收、查询和报告下载
pub mod create_scrape;
pub mod download_report;
pub mod query_tasks;
