// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::ExtractedRecord;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::task_repository::RepositoryError;
use async_trait::async_trait;

/// 抓取结果仓库特质
///
/// 定义抓取结果数据访问接口
#[async_trait]
pub trait ScrapeResultRepository: Send + Sync {
    /// 保存任务的聚合结果
    async fn save(
        &self,
        task_id: i32,
        records: &[ExtractedRecord],
    ) -> Result<ScrapeResult, RepositoryError>;
    /// 根据任务ID查找结果
    async fn find_by_task_id(&self, task_id: i32) -> Result<Option<ScrapeResult>, RepositoryError>;
}
