// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::models::record::ExtractedRecord;

/// 抓取结果实体
///
/// 一个任务全部提取记录的聚合。每个任务至多一个结果，
/// 且只在聚合非空时创建。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeResult {
    /// 结果ID，由存储层分配
    pub id: i32,
    /// 所属任务ID
    pub task_id: i32,
    /// 提取记录
    pub data: Vec<ExtractedRecord>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
}
