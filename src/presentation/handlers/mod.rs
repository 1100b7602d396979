// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// HTTP请求处理器模块
///
/// 每个处理器负责一类端点，业务逻辑委托给应用层用例
pub mod report_handler;
pub mod scrape_handler;
pub mod task_handler;
