// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

use crate::domain::models::record::ExtractedRecord;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::models::task::TaskStatus;

/// 任务接收响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeResponseDto {
    /// 新任务ID
    pub task_id: i32,
    /// 任务状态，新建任务总是`queued`
    pub status: TaskStatus,
}

/// 任务结果响应
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeResultDto {
    pub id: i32,
    pub task_id: i32,
    pub data: Vec<ExtractedRecord>,
}

impl From<ScrapeResult> for ScrapeResultDto {
    fn from(result: ScrapeResult) -> Self {
        Self {
            id: result.id,
            task_id: result.task_id,
            data: result.data,
        }
    }
}
