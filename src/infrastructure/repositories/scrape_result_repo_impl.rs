// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::record::ExtractedRecord;
use crate::domain::models::scrape_result::ScrapeResult;
use crate::domain::repositories::scrape_result_repository::ScrapeResultRepository;
use crate::domain::repositories::task_repository::RepositoryError;
use crate::infrastructure::database::entities::scrape_result as scrape_result_entity;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::*;
use std::sync::Arc;

/// 抓取结果仓库实现
///
/// 一个任务的全部记录以JSON数组形式存放在一行中
#[derive(Clone)]
pub struct ScrapeResultRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeResultRepositoryImpl {
    /// 创建新的抓取结果仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl TryFrom<scrape_result_entity::Model> for ScrapeResult {
    type Error = RepositoryError;

    fn try_from(model: scrape_result_entity::Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            task_id: model.task_id,
            data: serde_json::from_value(model.data)?,
            created_at: model.created_at,
        })
    }
}

#[async_trait]
impl ScrapeResultRepository for ScrapeResultRepositoryImpl {
    async fn save(
        &self,
        task_id: i32,
        records: &[ExtractedRecord],
    ) -> Result<ScrapeResult, RepositoryError> {
        let active_model = scrape_result_entity::ActiveModel {
            task_id: Set(task_id),
            data: Set(serde_json::to_value(records)?),
            created_at: Set(Utc::now().into()),
            ..Default::default()
        };

        let inserted = active_model.insert(self.db.as_ref()).await?;
        inserted.try_into()
    }

    async fn find_by_task_id(&self, task_id: i32) -> Result<Option<ScrapeResult>, RepositoryError> {
        let model = scrape_result_entity::Entity::find()
            .filter(scrape_result_entity::Column::TaskId.eq(task_id))
            .one(self.db.as_ref())
            .await?;

        model.map(TryInto::try_into).transpose()
    }
}
