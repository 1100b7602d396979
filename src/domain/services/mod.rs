// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 包含的服务：
/// - URL发现（url_discovery）：从种子页收集候选URL
/// - 分页遍历（pagination）：沿"next"链接逐页抓取
/// - 字段提取（field_extractor）：按启发式规则从HTML中提取企业信息
/// - 报告渲染（report_renderer）：将任务记录排版并保存为报告
pub mod extraction_config;
pub mod field_extractor;
pub mod pagination;
pub mod report_renderer;
pub mod url_discovery;
